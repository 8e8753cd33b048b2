use api::applications;
use api::models::Application;
use dioxus::prelude::*;

use crate::hooks::{use_collection, UseCollection};
use crate::session::use_session;
use crate::views::common::Spinner;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// The signed-in candidate's applications, with withdraw.
#[component]
pub fn ApplicationsView(on_find_jobs: EventHandler<()>) -> Element {
    let session = use_session();
    let mine = use_collection::<Application>();

    let client = session.client();
    use_hook(move || {
        let collection = mine.controller();
        spawn(async move {
            collection.load(applications::candidate_list(&client)).await;
        });
    });

    let state = mine.state();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "page",
            h1 { "My Applications" }
            if state.is_loading() {
                Spinner {}
            } else if let Some(error) = state.load_error.clone() {
                div { class: "banner error", "{error}" }
            } else if state.items.is_empty() {
                div {
                    class: "empty",
                    p { "You haven't applied to any jobs yet." }
                    button { class: "btn primary", onclick: move |_| on_find_jobs.call(()), "Find Jobs" }
                }
            } else {
                div {
                    class: "card-list",
                    for app in state.items.iter().cloned() {
                        ApplicationRow {
                            key: "{app.id}",
                            error: state.item_error(&app.id).map(str::to_string),
                            pending: state.is_pending(&app.id),
                            app: app.clone(),
                            mine,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ApplicationRow(
    app: Application,
    #[props(!optional)] error: Option<String>,
    pending: bool,
    mine: UseCollection<Application>,
) -> Element {
    let session = use_session();
    let id = app.id;
    let title = app.job_title.clone().unwrap_or_else(|| "Job".to_string());
    let applied = app.applied_at.format("%b %-d, %Y").to_string();
    let resume = app.resume_path().map(|path| session.client().media_url(path));

    rsx! {
        div {
            class: "card row",
            div {
                h3 { "{title}" }
                if let Some(location) = app.job_location.clone() {
                    p { class: "muted", "{location}" }
                }
                p { class: "muted small", "Applied {applied}" }
                if let Some(url) = resume {
                    a { href: "{url}", target: "_blank", "Resume" }
                }
            }
            div {
                class: "row-actions",
                span { class: "status {app.status.as_str()}", "{app.status.label()}" }
                button {
                    class: "btn danger",
                    disabled: pending,
                    onclick: move |_| {
                        let collection = mine.controller();
                        let client = session.client();
                        async move {
                            if let Err(err) = collection.remove(id, applications::withdraw(&client, id)).await {
                                tracing::warn!(id, error = %err, "withdraw failed");
                            }
                        }
                    },
                    "Withdraw"
                }
            }
            if let Some(error) = error {
                p { class: "field-error", "{error}" }
            }
        }
    }
}
