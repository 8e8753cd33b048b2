use api::{Role, SessionState};
use dioxus::prelude::*;

use crate::session::use_session;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// A navigation target. The platform crate maps each item to a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavItem {
    Home,
    Login,
    Register,
    MyApplications,
    FindJobs,
    Applicants,
    PostJob,
    Logout,
}

impl NavItem {
    pub fn label(&self) -> &'static str {
        match self {
            NavItem::Home => "Jobify",
            NavItem::Login => "Login",
            NavItem::Register => "Register",
            NavItem::MyApplications => "My Applications",
            NavItem::FindJobs => "Find Jobs",
            NavItem::Applicants => "Applicants",
            NavItem::PostJob => "Post Job",
            NavItem::Logout => "Logout",
        }
    }
}

/// Items shown for a session state. Nothing is shown while the session is
/// still resolving.
pub fn nav_items(state: SessionState) -> Vec<NavItem> {
    match state {
        SessionState::Loading => Vec::new(),
        SessionState::Anonymous => vec![NavItem::Login, NavItem::Register],
        SessionState::Authenticated(identity) => match identity.role {
            Role::Candidate => vec![NavItem::MyApplications, NavItem::FindJobs, NavItem::Logout],
            Role::Employer => vec![NavItem::Applicants, NavItem::PostJob, NavItem::Logout],
        },
    }
}

#[component]
pub fn Navbar(on_navigate: EventHandler<NavItem>, children: Element) -> Element {
    let session = use_session();
    let items = nav_items(session.state());

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        nav {
            class: "navbar",
            button {
                class: "navbar-brand",
                onclick: move |_| on_navigate.call(NavItem::Home),
                span { "Job" }
                span { class: "accent", "ify" }
            }
            div {
                class: "navbar-items",
                for item in items {
                    button {
                        key: "{item:?}",
                        class: if item == NavItem::Logout { "nav-btn logout" } else { "nav-btn" },
                        onclick: {
                            let session = session.clone();
                            move |_| {
                                if item == NavItem::Logout {
                                    session.session().logout();
                                }
                                on_navigate.call(item);
                            }
                        },
                        "{item.label()}"
                    }
                }
            }
        }
        {children}
    }
}
