use api::Action;
use dioxus::prelude::*;
use ui::views::ApplicationsView;

use super::Gate;
use crate::Route;

#[component]
pub fn Applications() -> Element {
    let nav = use_navigator();
    rsx! {
        Gate {
            action: Action::ViewOwnApplications,
            ApplicationsView {
                on_find_jobs: move |_| {
                    nav.push(Route::jobs());
                },
            }
        }
    }
}
