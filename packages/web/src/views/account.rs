//! Login, registration and the two profile editors.

use api::models::Role;
use api::Landing;
use dioxus::prelude::*;
use ui::use_session;
use ui::views::{CandidateProfileView, EmployerProfileView, LoginView, RegisterView};

use crate::Route;

#[component]
pub fn Login() -> Element {
    let nav = use_navigator();
    rsx! {
        LoginView {
            on_landing: move |landing| {
                nav.replace(Route::landing(landing));
            },
            on_register: move |_| {
                nav.push(Route::Register {});
            },
        }
    }
}

#[component]
pub fn Register() -> Element {
    let nav = use_navigator();
    rsx! {
        RegisterView {
            on_landing: move |landing| {
                nav.replace(Route::landing(landing));
            },
        }
    }
}

/// Profile editor for `role`, or a notice when the session has another role.
#[component]
fn ProfileFor(role: Role) -> Element {
    let session = use_session();
    let nav = use_navigator();
    let state = session.state();

    if state.is_loading() {
        return rsx! {
            div { class: "spinner", "Loading..." }
        };
    }
    if state.role() != Some(role) {
        return rsx! {
            div {
                class: "page empty",
                p { "Log in as {role} to edit this profile." }
            }
        };
    }
    match role {
        Role::Candidate => rsx! {
            CandidateProfileView {
                on_saved: move |_| {
                    nav.replace(Route::landing(Landing::Home));
                },
            }
        },
        Role::Employer => rsx! {
            EmployerProfileView {
                on_saved: move |_| {
                    nav.replace(Route::landing(Landing::EmployerDashboard));
                },
            }
        },
    }
}

#[component]
pub fn CandidateProfile() -> Element {
    rsx! {
        ProfileFor { role: Role::Candidate }
    }
}

#[component]
pub fn CreateCandidateProfile() -> Element {
    rsx! {
        ProfileFor { role: Role::Candidate }
    }
}

#[component]
pub fn EmployerProfile() -> Element {
    rsx! {
        ProfileFor { role: Role::Employer }
    }
}

#[component]
pub fn CreateEmployerProfile() -> Element {
    rsx! {
        ProfileFor { role: Role::Employer }
    }
}
