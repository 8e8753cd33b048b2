//! Company profile editor. The existence probe decides whether saving
//! creates (`POST`) or updates (`PUT`) the profile.

use api::models::EmployerProfileDraft;
use api::{profiles, FormController, ProfileKind, ProfileStatus};
use dioxus::prelude::*;

use crate::hooks::{read_upload, use_form};
use crate::session::use_session;
use crate::views::common::{FieldError, FormBanner, Spinner, TextArea, TextField};

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

#[component]
pub fn EmployerProfileView(on_saved: EventHandler<()>) -> Element {
    let session = use_session();
    let form = use_form(|| FormController::edit(EmployerProfileDraft::default()));
    let mut status = use_signal(|| None::<ProfileStatus>);
    let mut logo = use_signal(|| None::<String>);

    let client = session.client();
    use_hook(move || {
        spawn(async move {
            let probed = profiles::probe(&client, ProfileKind::Employer).await;
            if probed == ProfileStatus::Exists {
                match profiles::employer(&client).await {
                    Ok(profile) => {
                        logo.set(profile.logo.as_deref().map(|path| client.media_url(path)));
                        form.controller().replace(EmployerProfileDraft::from(&profile));
                    }
                    Err(err) => tracing::warn!(error = %err, "employer profile fetch failed"),
                }
            }
            status.set(Some(probed));
        });
    });

    let Some(current) = status() else {
        return rsx! { Spinner {} };
    };
    let state = form.state();

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let controller = form.controller();
        let client = session.client();
        async move {
            let saved = controller
                .submit(
                    |draft| async move { profiles::save_employer(&client, current, &draft).await },
                    |saved| status.set(Some(*saved)),
                )
                .await;
            if saved.is_some() {
                on_saved.call(());
            }
        }
    };

    let pick_logo = move |evt: FormEvent| async move {
        let controller = form.controller();
        let Some(upload) = read_upload(&evt).await else {
            return;
        };
        match upload.accept_image() {
            Ok(upload) => {
                controller.clear_field_error("logo");
                controller.update(|d| d.logo = Some(upload));
            }
            Err(message) => controller.set_field_error("logo", message),
        }
    };

    let heading = match current {
        ProfileStatus::Missing => "Create your company profile",
        ProfileStatus::Exists => "Company profile",
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "page",
            h1 { "{heading}" }
            if let Some(url) = logo() {
                img { class: "logo", src: "{url}", alt: "Company logo" }
            }
            form {
                class: "form",
                onsubmit: submit,
                TextField {
                    label: "Company name",
                    value: state.draft.company_name.clone(),
                    error: state.field_error("company_name").map(str::to_string),
                    oninput: move |v| form.update(|d| d.company_name = v),
                }
                TextField {
                    label: "Tagline",
                    value: state.draft.description.clone(),
                    error: None,
                    oninput: move |v| form.update(|d| d.description = v),
                }
                TextArea {
                    label: "About the company",
                    value: state.draft.about_company.clone(),
                    error: None,
                    oninput: move |v| form.update(|d| d.about_company = v),
                }
                TextField {
                    label: "Location",
                    value: state.draft.location.clone(),
                    error: None,
                    oninput: move |v| form.update(|d| d.location = v),
                }
                TextField {
                    label: "Website",
                    kind: "url",
                    value: state.draft.website_link.clone(),
                    error: state.field_error("website_link").map(str::to_string),
                    oninput: move |v| form.update(|d| d.website_link = v),
                }
                TextField {
                    label: "LinkedIn",
                    kind: "url",
                    value: state.draft.linkedin_link.clone(),
                    error: state.field_error("linkedin_link").map(str::to_string),
                    oninput: move |v| form.update(|d| d.linkedin_link = v),
                }
                label {
                    class: "field",
                    span { "Logo" }
                    input { r#type: "file", accept: "image/*", onchange: pick_logo }
                    FieldError { message: state.field_error("logo").map(str::to_string) }
                }
                FormBanner { status: state.status.clone(), success: "Profile saved" }
                button {
                    class: "btn primary",
                    r#type: "submit",
                    disabled: state.is_submitting(),
                    if state.is_submitting() { "Saving..." } else { "Save profile" }
                }
            }
        }
    }
}
