use api::Action;
use dioxus::prelude::*;
use ui::views::{JobDetailView, JobsView, PostJobView};

use super::Gate;
use crate::{Route, SearchQuery};

#[component]
pub fn Jobs(query: SearchQuery) -> Element {
    let nav = use_navigator();
    rsx! {
        JobsView {
            search: query.value(),
            on_search: move |search| {
                nav.replace(Route::Jobs {
                    query: SearchQuery::new(search),
                });
            },
            on_open: move |id| {
                nav.push(Route::JobDetail { id });
            },
        }
    }
}

#[component]
pub fn JobDetail(id: i64) -> Element {
    let nav = use_navigator();
    rsx! {
        JobDetailView {
            id,
            on_deleted: move |_| {
                nav.replace(Route::Dashboard {});
            },
        }
    }
}

#[component]
pub fn PostJob() -> Element {
    let nav = use_navigator();
    rsx! {
        Gate {
            action: Action::PostJob,
            PostJobView {
                on_open: move |id| {
                    nav.push(Route::JobDetail { id });
                },
            }
        }
    }
}
