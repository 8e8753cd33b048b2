use api::Action;
use dioxus::prelude::*;
use ui::views::{ApplicantsView, DashboardView};

use super::Gate;
use crate::{Route, SearchQuery};

#[component]
pub fn Dashboard() -> Element {
    let nav = use_navigator();
    rsx! {
        Gate {
            action: Action::ViewApplicants,
            DashboardView {
                on_open_job: move |id| {
                    nav.push(Route::JobDetail { id });
                },
                on_applicants: move |_| {
                    nav.push(Route::Applicants {
                        query: SearchQuery::default(),
                    });
                },
                on_edit_profile: move |_| {
                    nav.push(Route::EmployerProfile {});
                },
            }
        }
    }
}

#[component]
pub fn Applicants(query: SearchQuery) -> Element {
    let nav = use_navigator();
    rsx! {
        Gate {
            action: Action::ViewApplicants,
            ApplicantsView {
                search: query.value(),
                on_search: move |search| {
                    nav.replace(Route::Applicants {
                        query: SearchQuery::new(search),
                    });
                },
            }
        }
    }
}
