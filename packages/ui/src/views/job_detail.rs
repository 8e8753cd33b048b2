//! One posting. Candidates get the apply form (or an "already applied"
//! note), the employer who owns it gets edit and delete.

use api::models::{ApplicationDraft, JobEdit, JobPosting};
use api::{applications, jobs, Action, FormController};
use dioxus::prelude::*;

use crate::hooks::{read_upload, use_collection, use_form, UseCollection};
use crate::session::use_session;
use crate::views::common::{FieldError, FormBanner, Spinner, TextArea, TextField};
use crate::views::jobs::JobCard;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

#[component]
pub fn JobDetailView(id: i64, on_deleted: EventHandler<()>) -> Element {
    let session = use_session();
    let detail = use_collection::<JobPosting>();
    let mut editing = use_signal(|| false);
    let mut owned = use_signal(|| false);

    let mut job_id = use_signal(|| id);
    if *job_id.peek() != id {
        job_id.set(id);
    }

    let client = session.client();
    use_effect(move || {
        let id = job_id();
        let collection = detail.controller();
        let client = client.clone();
        spawn(async move {
            collection
                .load(async { jobs::get(&client, id).await.map(|job| vec![job]) })
                .await;
        });
    });

    let owner_session = session.clone();
    use_effect(move || {
        let id = job_id();
        owned.set(false);
        if !owner_session.can(Action::EditJob) {
            return;
        }
        let client = owner_session.client();
        spawn(async move {
            let mine = jobs::is_owner(&client, id).await;
            if *job_id.peek() == id {
                owned.set(mine);
            }
        });
    });

    let state = detail.state();
    let Some(job) = state.get(&id).cloned() else {
        return rsx! {
            document::Link { rel: "stylesheet", href: VIEWS_CSS }
            div {
                class: "page",
                if state.is_loading() {
                    Spinner {}
                } else {
                    div {
                        class: "banner error",
                        {state.load_error.clone().unwrap_or_else(|| "Job not found".to_string())}
                    }
                }
            }
        };
    };

    let item_error = state.item_error(&id).map(str::to_string);
    let pending = state.is_pending(&id);
    let delete_client = session.client();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "page detail",
            if editing() {
                EditJobForm {
                    job: job.clone(),
                    detail,
                    on_done: move |_| editing.set(false),
                }
            } else {
                JobCard { job: job.clone(), onclick: |_| {} }
                div { class: "description", "{job.description}" }
            }
            if let Some(error) = item_error {
                div { class: "banner error", "{error}" }
            }
            if owned() && !editing() {
                div {
                    class: "actions",
                    if session.can(Action::EditJob) {
                        button {
                            class: "btn",
                            disabled: pending,
                            onclick: move |_| editing.set(true),
                            "Edit"
                        }
                    }
                    if session.can(Action::DeleteJob) {
                        button {
                            class: "btn danger",
                            disabled: pending,
                            onclick: move |_| {
                                let collection = detail.controller();
                                let client = delete_client.clone();
                                async move {
                                    if collection.remove(id, jobs::delete(&client, id)).await.is_ok() {
                                        on_deleted.call(());
                                    }
                                }
                            },
                            "Delete"
                        }
                    }
                }
            }
            if session.can(Action::Apply) {
                ApplySection { job_id: id }
            } else if !session.state().is_loading() && session.state().role().is_none() {
                p { class: "muted", "Log in as a candidate to apply." }
            }
        }
    }
}

#[component]
fn EditJobForm(job: JobPosting, detail: UseCollection<JobPosting>, on_done: EventHandler<()>) -> Element {
    let session = use_session();
    let form = use_form(|| FormController::edit(JobEdit::from(&job)));
    let state = form.state();
    let id = job.id;

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let controller = form.controller();
        let collection = detail.controller();
        let client = session.client();
        async move {
            let saved = controller
                .submit(
                    |edit| async move {
                        collection
                            .update(id, |job| job.with_edit(&edit), jobs::update(&client, id, &edit))
                            .await
                    },
                    |_| {},
                )
                .await;
            if saved.is_some() {
                on_done.call(());
            }
        }
    };

    rsx! {
        form {
            class: "form",
            onsubmit: submit,
            TextField {
                label: "Title",
                value: state.draft.title.clone(),
                error: state.field_error("title").map(str::to_string),
                oninput: move |v| form.update(|d| d.title = v),
            }
            TextField {
                label: "Location",
                value: state.draft.location.clone(),
                error: state.field_error("location").map(str::to_string),
                oninput: move |v| form.update(|d| d.location = v),
            }
            TextArea {
                label: "Description",
                value: state.draft.description.clone(),
                error: state.field_error("description").map(str::to_string),
                oninput: move |v| form.update(|d| d.description = v),
            }
            FormBanner { status: state.status.clone() }
            div {
                class: "actions",
                button {
                    class: "btn primary",
                    r#type: "submit",
                    disabled: state.is_submitting(),
                    if state.is_submitting() { "Saving..." } else { "Save" }
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_done.call(()),
                    "Cancel"
                }
            }
        }
    }
}

/// Apply form, hidden once the candidate's applications include this job.
#[component]
fn ApplySection(job_id: i64) -> Element {
    let session = use_session();
    let form = use_form(FormController::<ApplicationDraft>::create);
    let mut applied = use_signal(|| None::<bool>);

    let client = session.client();
    use_hook(move || {
        spawn(async move {
            applied.set(Some(applications::has_applied_to(&client, job_id).await));
        });
    });

    let state = form.state();
    match applied() {
        None => return rsx! { Spinner { label: "Checking your applications..." } },
        Some(true) => {
            return rsx! {
                div { class: "banner success", "You have already applied to this job." }
            }
        }
        Some(false) => {}
    }

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let controller = form.controller();
        let client = session.client();
        async move {
            controller
                .submit(
                    |draft| async move { applications::apply(&client, job_id, &draft).await },
                    |_| applied.set(Some(true)),
                )
                .await;
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
            Err(message) => {
                controller.update(|d| d.resume = None);
                controller.set_field_error("resume", message);
            }
        }
    };

    let chars = state.draft.cover_letter.trim().chars().count();

    rsx! {
        form {
            class: "form",
            onsubmit: submit,
            h2 { "Apply for this job" }
            TextArea {
                label: "Cover letter ({chars} characters)",
                value: state.draft.cover_letter.clone(),
                error: state.field_error("cover_letter").map(str::to_string),
                oninput: move |v| form.update(|d| d.cover_letter = v),
            }
            label {
                class: "field",
                span { "Resume (PDF)" }
                input {
                    r#type: "file",
                    accept: ".pdf,application/pdf",
                    onchange: pick_resume,
                }
                FieldError { message: state.field_error("resume").map(str::to_string) }
            }
            FormBanner { status: state.status.clone(), success: "Application submitted" }
            button {
                class: "btn primary",
                r#type: "submit",
                disabled: state.is_submitting(),
                if state.is_submitting() { "Submitting..." } else { "Apply" }
            }
        }
    }
}
