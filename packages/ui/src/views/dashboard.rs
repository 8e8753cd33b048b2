use api::dashboard::{employer_dashboard, RECENT_APPLICANTS};
use dioxus::prelude::*;

use crate::session::use_session;
use crate::views::common::Spinner;
use crate::views::jobs::JobCard;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// Employer home: totals, postings, recent applicants and the company
/// profile.
#[component]
pub fn DashboardView(
    on_open_job: EventHandler<i64>,
    on_applicants: EventHandler<()>,
    on_edit_profile: EventHandler<()>,
) -> Element {
    let session = use_session();
    let client = session.client();
    let dashboard = use_resource(move || {
        let client = client.clone();
        async move { employer_dashboard(&client).await }
    });

    let body = match &*dashboard.read() {
        None => rsx! { Spinner {} },
        Some(Err(err)) => rsx! {
            div { class: "banner error", "{err.user_message()}" }
        },
        Some(Ok(data)) => {
            let company = data
                .profile
                .as_ref()
                .map(|p| p.company_name.clone())
                .filter(|name| !name.is_empty());
            let recent: Vec<_> = data
                .recent_applicants(RECENT_APPLICANTS)
                .into_iter()
                .cloned()
                .collect();
            rsx! {
                div {
                    class: "page-header",
                    h1 { {company.clone().unwrap_or_else(|| "Dashboard".to_string())} }
                    button {
                        class: "btn",
                        onclick: move |_| on_edit_profile.call(()),
                        if company.is_some() { "Edit company profile" } else { "Create company profile" }
                    }
                }
                div {
                    class: "stats",
                    div { class: "stat", span { "Job posts" } strong { "{data.total_posts()}" } }
                    div { class: "stat", span { "Applications" } strong { "{data.total_applications()}" } }
                }
                div {
                    class: "columns",
                    section {
                        h2 { "Your postings" }
                        if data.jobs.is_empty() {
                            p { class: "empty", "No postings yet." }
                        }
                        div {
                            class: "card-list",
                            for job in data.jobs.iter().cloned() {
                                JobCard {
                                    key: "{job.id}",
                                    job: job.clone(),
                                    onclick: move |id| on_open_job.call(id),
                                }
                            }
                        }
                    }
                    section {
                        h2 { "Recent applicants" }
                        if recent.is_empty() {
                            p { class: "empty", "No applications yet." }
                        }
                        ul {
                            class: "recent",
                            for app in recent {
                                li {
                                    key: "{app.id}",
                                    strong { {app.candidate_name.clone().unwrap_or_else(|| "Candidate".to_string())} }
                                    " applied for "
                                    {app.job_title.clone().unwrap_or_default()}
                                    span { class: "status {app.status.as_str()}", "{app.status.label()}" }
                                }
                            }
                        }
                        button {
                            class: "btn",
                            onclick: move |_| on_applicants.call(()),
                            "View all applicants"
                        }
                    }
                }
            }
        }
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div { class: "page", {body} }
    }
}
