//! Candidate profile editor: profile fields, skills, one education entry and
//! an optional experience entry. Existing education and experience are
//! listed above the form.

use api::models::{CandidateProfileDraft, Education, ExperienceDraft};
use api::profiles::{self, CandidateOverview, CandidateProgress};
use api::{FormController, ProfileKind, ProfileStatus};
use dioxus::prelude::*;

use crate::hooks::{read_upload, use_form};
use crate::session::use_session;
use crate::views::common::{FieldError, FormBanner, Spinner, TextArea, TextField};

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

#[component]
pub fn CandidateProfileView(on_saved: EventHandler<()>) -> Element {
    let session = use_session();
    let form = use_form(|| FormController::edit(CandidateProfileDraft::default()));
    let mut progress = use_signal(|| None::<CandidateProgress>);
    let mut overview = use_signal(|| None::<CandidateOverview>);
    let mut skill_input = use_signal(String::new);

    let client = session.client();
    use_hook(move || {
        spawn(async move {
            let probed = profiles::probe(&client, ProfileKind::Candidate).await;
            if probed == ProfileStatus::Exists {
                match profiles::candidate_overview(&client).await {
                    Ok(loaded) => {
                        form.controller()
                            .replace(CandidateProfileDraft::from(&loaded.profile));
                        overview.set(Some(loaded));
                    }
                    Err(err) => tracing::warn!(error = %err, "candidate profile fetch failed"),
                }
            }
            progress.set(Some(CandidateProgress::new(probed)));
        });
    });

    let Some(current) = progress() else {
        return rsx! { Spinner {} };
    };
    let state = form.state();
    let draft = state.draft.clone();
    let err = |field: &str| state.field_error(field).map(str::to_string);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let controller = form.controller();
        let client = session.client();
        async move {
            let saved = controller
                .submit(
                    |draft| async move {
                        let mut step = (*progress.peek()).unwrap_or(current);
                        let result = profiles::save_candidate(&client, &mut step, &draft).await;
                        progress.set(Some(step));
                        result
                    },
                    |_| {},
                )
                .await;
            if saved.is_some() {
                on_saved.call(());
            }
        }
    };

    let pick_image = move |evt: FormEvent| async move {
        let controller = form.controller();
        let Some(upload) = read_upload(&evt).await else {
            return;
        };
        match upload.accept_image() {
            Ok(upload) => {
                controller.clear_field_error("profile_image");
                controller.update(|d| d.profile_image = Some(upload));
            }
            Err(message) => controller.set_field_error("profile_image", message),
        }
    };

    let pick_resume = move |evt: FormEvent| async move {
        let controller = form.controller();
        let Some(upload) = read_upload(&evt).await else {
            return;
        };
        match upload.accept_pdf() {
            Ok(upload) => {
                controller.clear_field_error("resume");
                controller.update(|d| d.resume = Some(upload));
            }
            Err(message) => controller.set_field_error("resume", message),
        }
    };

    let mut add_skill = move || {
        let text = skill_input();
        form.update(|d| {
            d.add_skill(&text);
        });
        skill_input.set(String::new());
    };

    let heading = match current.profile {
        ProfileStatus::Missing => "Create your profile",
        ProfileStatus::Exists => "Your profile",
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "page",
            h1 { "{heading}" }
            if let Some(loaded) = overview() {
                ProfileOverview { overview: loaded }
            }
            form {
                class: "form",
                onsubmit: submit,
                TextField {
                    label: "Full name",
                    value: draft.full_name.clone(),
                    error: err("full_name"),
                    oninput: move |v| form.update(|d| d.full_name = v),
                }
                TextArea {
                    label: "Bio",
                    value: draft.bio.clone(),
                    error: None,
                    oninput: move |v| form.update(|d| d.bio = v),
                }
                TextField {
                    label: "Portfolio",
                    kind: "url",
                    value: draft.portfolio_link.clone(),
                    error: err("portfolio_link"),
                    oninput: move |v| form.update(|d| d.portfolio_link = v),
                }
                TextField {
                    label: "LinkedIn",
                    kind: "url",
                    value: draft.linkedin_link.clone(),
                    error: err("linkedin_link"),
                    oninput: move |v| form.update(|d| d.linkedin_link = v),
                }

                div {
                    class: "field",
                    span { "Skills" }
                    div {
                        class: "tags",
                        for skill in draft.skills.iter().cloned() {
                            span {
                                key: "{skill}",
                                class: "tag removable",
                                "{skill}"
                                button {
                                    r#type: "button",
                                    onclick: move |_| form.update(|d| d.remove_skill(&skill)),
                                    "×"
                                }
                            }
                        }
                    }
                    div {
                        class: "inline",
                        input {
                            value: "{skill_input}",
                            placeholder: "Add a skill",
                            oninput: move |evt| skill_input.set(evt.value()),
                            onkeydown: move |evt| {
                                if evt.key() == Key::Enter {
                                    evt.prevent_default();
                                    add_skill();
                                }
                            },
                        }
                        button { class: "btn", r#type: "button", onclick: move |_| add_skill(), "Add" }
                    }
                }

                label {
                    class: "field",
                    span { "Profile image" }
                    input { r#type: "file", accept: "image/*", onchange: pick_image }
                    FieldError { message: err("profile_image") }
                }
                label {
                    class: "field",
                    span { "Resume (PDF)" }
                    input { r#type: "file", accept: ".pdf,application/pdf", onchange: pick_resume }
                    FieldError { message: err("resume") }
                }

                fieldset {
                    legend { "Education" }
                    TextField {
                        label: "Institution",
                        value: draft.education.institution.clone(),
                        error: err("institution"),
                        oninput: move |v| form.update(|d| d.education.institution = v),
                    }
                    TextField {
                        label: "Degree",
                        value: draft.education.degree.clone(),
                        error: err("degree"),
                        oninput: move |v| form.update(|d| d.education.degree = v),
                    }
                    div {
                        class: "field-row",
                        TextField {
                            label: "Start year",
                            kind: "number",
                            value: draft.education.start_year.clone(),
                            error: err("start_year"),
                            oninput: move |v| form.update(|d| d.education.start_year = v),
                        }
                        if !draft.education.is_current {
                            TextField {
                                label: "End year",
                                kind: "number",
                                value: draft.education.end_year.clone(),
                                error: err("end_year"),
                                oninput: move |v| form.update(|d| d.education.end_year = v),
                            }
                        }
                    }
                    label {
                        class: "check",
                        input {
                            r#type: "checkbox",
                            checked: draft.education.is_current,
                            onchange: move |evt| form.update(|d| d.education.is_current = evt.checked()),
                        }
                        "Currently studying here"
                    }
                }

                fieldset {
                    legend { "Experience" }
                    label {
                        class: "check",
                        input {
                            r#type: "checkbox",
                            checked: draft.experience.is_some(),
                            onchange: move |evt| {
                                let on = evt.checked();
                                form.update(|d| d.experience = on.then(ExperienceDraft::default));
                            },
                        }
                        "Add work experience"
                    }
                    if let Some(experience) = draft.experience.clone() {
                        TextField {
                            label: "Company",
                            value: experience.company_name.clone(),
                            error: err("experience_company"),
                            oninput: move |v| form.update(|d| {
                                if let Some(e) = d.experience.as_mut() {
                                    e.company_name = v;
                                }
                            }),
                        }
                        TextField {
                            label: "Role",
                            value: experience.role.clone(),
                            error: err("experience_role"),
                            oninput: move |v| form.update(|d| {
                                if let Some(e) = d.experience.as_mut() {
                                    e.role = v;
                                }
                            }),
                        }
                        TextArea {
                            label: "What you did",
                            value: experience.role_description.clone(),
                            error: None,
                            oninput: move |v| form.update(|d| {
                                if let Some(e) = d.experience.as_mut() {
                                    e.role_description = v;
                                }
                            }),
                        }
                        div {
                            class: "field-row",
                            TextField {
                                label: "Start date",
                                kind: "date",
                                value: experience.start_date.clone(),
                                error: err("experience_start"),
                                oninput: move |v| form.update(|d| {
                                    if let Some(e) = d.experience.as_mut() {
                                        e.start_date = v;
                                    }
                                }),
                            }
                            if !experience.is_current {
                                TextField {
                                    label: "End date",
                                    kind: "date",
                                    value: experience.end_date.clone(),
                                    error: err("experience_end"),
                                    oninput: move |v| form.update(|d| {
                                        if let Some(e) = d.experience.as_mut() {
                                            e.end_date = v;
                                        }
                                    }),
                                }
                            }
                        }
                        label {
                            class: "check",
                            input {
                                r#type: "checkbox",
                                checked: experience.is_current,
                                onchange: move |evt| form.update(|d| {
                                    if let Some(e) = d.experience.as_mut() {
                                        e.is_current = evt.checked();
                                    }
                                }),
                            }
                            "I currently work here"
                        }
                    }
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

#[component]
fn ProfileOverview(overview: CandidateOverview) -> Element {
    let session = use_session();
    let image = overview
        .profile
        .profile_image
        .as_deref()
        .map(|path| session.client().media_url(path));

    rsx! {
        div {
            class: "card overview",
            if let Some(url) = image {
                img { class: "avatar", src: "{url}", alt: "Profile image" }
            }
            h2 { "{overview.profile.full_name}" }
            if !overview.education.is_empty() {
                h3 { "Education" }
                ul {
                    for entry in overview.education.iter() {
                        li { "{entry.degree}, {entry.institution} ({years(entry)})" }
                    }
                }
            }
            if !overview.experience.is_empty() {
                h3 { "Experience" }
                ul {
                    for entry in overview.experience.iter() {
                        li {
                            "{entry.role} at {entry.company_name} from {entry.start_date}"
                            if let Some(end) = entry.end_date {
                                " to {end}"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn years(entry: &Education) -> String {
    match entry.end_year {
        Some(end) => format!("{} to {end}", entry.start_year),
        None => format!("{} to present", entry.start_year),
    }
}
