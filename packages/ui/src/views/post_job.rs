//! Post a job. The employer's own postings are listed below the form and the
//! new posting appears there immediately as a placeholder.

use api::models::{ExperienceLevel, JobDraft, JobPosting, JobType, WorkMode};
use api::{jobs, FormController};
use dioxus::prelude::*;

use crate::hooks::{use_collection, use_form};
use crate::session::use_session;
use crate::views::common::{FormBanner, Spinner, TextArea, TextField};
use crate::views::jobs::JobCard;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

#[component]
pub fn PostJobView(on_open: EventHandler<i64>) -> Element {
    let session = use_session();
    let form = use_form(FormController::<JobDraft>::create);
    let postings = use_collection::<JobPosting>();

    let client = session.client();
    use_hook(move || {
        let collection = postings.controller();
        spawn(async move {
            collection.load(jobs::mine(&client)).await;
        });
    });

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let controller = form.controller();
        let collection = postings.controller();
        let client = session.client();
        async move {
            let created = controller
                .submit(
                    |draft| async move {
                        let placeholder =
                            JobPosting::placeholder(collection.next_local_id(), &draft);
                        collection
                            .create(placeholder, jobs::create(&client, &draft))
                            .await
                    },
                    |job| tracing::info!(id = job.id, "job posted"),
                )
                .await;
            if created.is_none() {
                tracing::debug!("job not posted");
            }
        }
    };

    let state = form.state();
    let listing = postings.state();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "page",
            h1 { "Post a Job" }
            form {
                class: "form",
                onsubmit: submit,
                TextField {
                    label: "Job title",
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
                TextField {
                    label: "Salary",
                    value: state.draft.salary.clone(),
                    error: None,
                    oninput: move |v| form.update(|d| d.salary = v),
                }
                div {
                    class: "field-row",
                    label {
                        class: "field",
                        span { "Experience level" }
                        select {
                            value: "{state.draft.experience_level.as_str()}",
                            onchange: move |evt| {
                                if let Some(level) = ExperienceLevel::parse(&evt.value()) {
                                    form.update(|d| d.experience_level = level);
                                }
                            },
                            for level in ExperienceLevel::ALL {
                                option { value: "{level.as_str()}", "{level.label()}" }
                            }
                        }
                    }
                    label {
                        class: "field",
                        span { "Work mode" }
                        select {
                            value: "{state.draft.work_mode.as_str()}",
                            onchange: move |evt| {
                                if let Some(mode) = WorkMode::parse(&evt.value()) {
                                    form.update(|d| d.work_mode = mode);
                                }
                            },
                            for mode in WorkMode::ALL {
                                option { value: "{mode.as_str()}", "{mode.label()}" }
                            }
                        }
                    }
                    label {
                        class: "field",
                        span { "Job type" }
                        select {
                            value: "{state.draft.job_type.as_str()}",
                            onchange: move |evt| {
                                if let Some(kind) = JobType::parse(&evt.value()) {
                                    form.update(|d| d.job_type = kind);
                                }
                            },
                            for kind in JobType::ALL {
                                option { value: "{kind.as_str()}", "{kind.label()}" }
                            }
                        }
                    }
                }
                FormBanner { status: state.status.clone(), success: "Job posted" }
                button {
                    class: "btn primary",
                    r#type: "submit",
                    disabled: state.is_submitting(),
                    if state.is_submitting() { "Posting..." } else { "Post Job" }
                }
            }

            h2 { "Your postings" }
            if listing.is_loading() && listing.items.is_empty() {
                Spinner {}
            } else if let Some(error) = listing.load_error.clone() {
                div { class: "banner error", "{error}" }
            } else if listing.items.is_empty() {
                p { class: "empty", "You haven't posted any jobs yet." }
            } else {
                div {
                    class: "card-list",
                    for job in listing.items.iter().cloned() {
                        JobCard {
                            key: "{job.id}",
                            job: job.clone(),
                            onclick: move |id| on_open.call(id),
                        }
                    }
                }
            }
        }
    }
}
