//! Applications to the employer's jobs, searchable through the `search`
//! URL parameter, with accept/reject and delete.

use api::applications;
use api::models::{Application, ApplicationStatus};
use api::Action;
use dioxus::prelude::*;

use crate::hooks::{use_search_collection, UseCollection};
use crate::session::use_session;
use crate::views::common::Spinner;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

#[component]
pub fn ApplicantsView(search: String, on_search: EventHandler<Option<String>>) -> Element {
    let session = use_session();
    let client = session.client();
    let search = use_search_collection("search", search, move |filter| {
        let client = client.clone();
        async move { applications::employer_list(&client, filter.as_deref()).await }
    });

    let applicants = search.collection();
    let state = applicants.state();
    let input = search.input();
    let can_update = session.can(Action::UpdateApplicationStatus);
    let can_delete = session.can(Action::DeleteApplicant);

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "page",
            div {
                class: "page-header",
                h1 { "Applicants" }
                input {
                    class: "search",
                    r#type: "search",
                    placeholder: "Search by candidate, job or location",
                    value: "{input}",
                    oninput: move |evt| on_search.call(search.edit(&evt.value())),
                }
            }
            if state.is_loading() && state.items.is_empty() {
                Spinner {}
            } else if let Some(error) = state.load_error.clone() {
                div { class: "banner error", "{error}" }
            } else if state.items.is_empty() {
                p { class: "empty", "No applicants yet." }
            } else {
                table {
                    class: "applicants",
                    thead {
                        tr {
                            th { "Candidate" }
                            th { "Job" }
                            th { "Applied" }
                            th { "Status" }
                            th {}
                        }
                    }
                    tbody {
                        for app in state.items.iter().cloned() {
                            ApplicantRow {
                                key: "{app.id}",
                                error: state.item_error(&app.id).map(str::to_string),
                                pending: state.is_pending(&app.id),
                                can_update,
                                can_delete,
                                app: app.clone(),
                                applicants,
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ApplicantRow(
    app: Application,
    #[props(!optional)] error: Option<String>,
    pending: bool,
    can_update: bool,
    can_delete: bool,
    applicants: UseCollection<Application>,
) -> Element {
    let session = use_session();
    let id = app.id;
    let name = app.candidate_name.clone().unwrap_or_else(|| "Candidate".to_string());
    let job = app.job_title.clone().unwrap_or_default();
    let applied = app.applied_at.format("%b %-d, %Y").to_string();
    let resume = app.resume_path().map(|path| session.client().media_url(path));

    let set_status = {
        let session = session.clone();
        move |status: ApplicationStatus| {
            let collection = applicants.controller();
            let client = session.client();
            spawn(async move {
                let _ = collection
                    .update(
                        id,
                        |app| app.with_status(status),
                        applications::set_status(&client, id, status),
                    )
                    .await;
            });
        }
    };
    let accept = set_status.clone();
    let reject = set_status;

    rsx! {
        tr {
            class: if pending { "pending" } else { "" },
            td {
                "{name}"
                if let Some(url) = resume {
                    " "
                    a { href: "{url}", target: "_blank", "Resume" }
                }
            }
            td { "{job}" }
            td { "{applied}" }
            td {
                span { class: "status {app.status.as_str()}", "{app.status.label()}" }
            }
            td {
                class: "row-actions",
                if can_update {
                    button {
                        class: "btn",
                        disabled: pending || app.status == ApplicationStatus::Accepted,
                        onclick: move |_| accept(ApplicationStatus::Accepted),
                        "Accept"
                    }
                    button {
                        class: "btn",
                        disabled: pending || app.status == ApplicationStatus::Rejected,
                        onclick: move |_| reject(ApplicationStatus::Rejected),
                        "Reject"
                    }
                }
                if can_delete {
                    button {
                        class: "btn danger",
                        disabled: pending,
                        onclick: move |_| {
                            let collection = applicants.controller();
                            let client = session.client();
                            spawn(async move {
                                let _ = collection.remove(id, applications::discard(&client, id)).await;
                            });
                        },
                        "Delete"
                    }
                }
                if let Some(error) = error {
                    p { class: "field-error", "{error}" }
                }
            }
        }
    }
}
