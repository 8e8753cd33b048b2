//! Route components. Each one wires a shared view's callbacks to the router.

use api::Action;
use dioxus::prelude::*;
use ui::use_session;

use crate::Route;

mod account;
pub use account::{
    CandidateProfile, CreateCandidateProfile, CreateEmployerProfile, EmployerProfile, Login,
    Register,
};

mod jobs;
pub use jobs::{JobDetail, Jobs, PostJob};

mod employer;
pub use employer::{Applicants, Dashboard};

mod candidate;
pub use candidate::Applications;

/// Render `children` only for a session that may perform `action`.
#[component]
fn Gate(action: Action, children: Element) -> Element {
    let session = use_session();
    let state = session.state();
    let nav = use_navigator();

    if state.is_loading() {
        return rsx! {
            div { class: "spinner", "Loading..." }
        };
    }
    if !state.can(action) {
        return rsx! {
            div {
                class: "page empty",
                p { "You don't have access to this page." }
                if state.role().is_none() {
                    button {
                        class: "btn primary",
                        onclick: move |_| {
                            nav.push(Route::Login {});
                        },
                        "Login"
                    }
                }
            }
        };
    }
    rsx! {
        {children}
    }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div {
            class: "page empty",
            h1 { "Page not found" }
            p { "/{path}" }
            Link { to: Route::jobs(), "Browse jobs" }
        }
    }
}
