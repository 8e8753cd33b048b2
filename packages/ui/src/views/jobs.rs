use api::jobs;
use api::models::JobPosting;
use dioxus::prelude::*;

use crate::hooks::use_search_collection;
use crate::session::use_session;
use crate::views::common::Spinner;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// Public job board with a search box bound to the `search` URL parameter.
#[component]
pub fn JobsView(
    /// Current value of `search` in the URL, empty when absent.
    search: String,
    /// Replace the URL's `search` parameter; `None` removes it.
    on_search: EventHandler<Option<String>>,
    on_open: EventHandler<i64>,
) -> Element {
    let session = use_session();
    let client = session.client();
    let search = use_search_collection("search", search, move |filter| {
        let client = client.clone();
        async move { jobs::list(&client, filter.as_deref()).await }
    });

    let state = search.collection().state();
    let input = search.input();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "page",
            div {
                class: "page-header",
                h1 { "Find your next job" }
                input {
                    class: "search",
                    r#type: "search",
                    placeholder: "Search by title, company or location",
                    value: "{input}",
                    oninput: move |evt| on_search.call(search.edit(&evt.value())),
                }
            }
            if state.is_loading() && state.items.is_empty() {
                Spinner {}
            } else if let Some(error) = state.load_error.clone() {
                div { class: "banner error", "{error}" }
                p { class: "empty", "No jobs to show." }
            } else if state.items.is_empty() {
                p { class: "empty", "No jobs match your search." }
            } else {
                div {
                    class: "card-list",
                    for job in state.items.iter().cloned() {
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

#[component]
pub fn JobCard(job: JobPosting, onclick: EventHandler<i64>) -> Element {
    let id = job.id;
    let company = job.company_name.clone().unwrap_or_default();
    let posted = job.created_at.format("%b %-d, %Y").to_string();

    rsx! {
        div {
            class: if job.is_placeholder() { "card pending" } else { "card" },
            onclick: move |_| {
                if id > 0 {
                    onclick.call(id)
                }
            },
            h3 { "{job.title}" }
            if !company.is_empty() {
                p { class: "muted", "{company}" }
            }
            div {
                class: "tags",
                span { class: "tag", "{job.location}" }
                if let Some(mode) = job.work_mode {
                    span { class: "tag", "{mode.label()}" }
                }
                if let Some(kind) = job.job_type {
                    span { class: "tag", "{kind.label()}" }
                }
                if let Some(level) = job.experience_level {
                    span { class: "tag", "{level.label()}" }
                }
                if let Some(salary) = job.salary.clone() {
                    span { class: "tag", "{salary}" }
                }
            }
            p { class: "muted small", "Posted {posted}" }
        }
    }
}
