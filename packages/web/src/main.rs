use std::fmt;

use api::filter::{read_param, write_param};
use api::Landing;
use dioxus::prelude::*;

use ui::{NavItem, Navbar, SessionProvider};
use views::{
    Applicants, Applications, CandidateProfile, CreateCandidateProfile, CreateEmployerProfile,
    Dashboard, EmployerProfile, JobDetail, Jobs, Login, NotFound, PostJob, Register,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Root {},
        #[route("/jobs?:..query")]
        Jobs { query: SearchQuery },
        #[route("/jobs/:id")]
        JobDetail { id: i64 },
        #[route("/login")]
        Login {},
        #[route("/register")]
        Register {},
        #[route("/applications")]
        Applications {},
        #[route("/employer/dashboard")]
        Dashboard {},
        #[route("/employer/applicants?:..query")]
        Applicants { query: SearchQuery },
        #[route("/employer/postjob")]
        PostJob {},
        #[route("/profile/candidate")]
        CandidateProfile {},
        #[route("/profile/candidate/create")]
        CreateCandidateProfile {},
        #[route("/profile/employer")]
        EmployerProfile {},
        #[route("/profile/employer/create")]
        CreateEmployerProfile {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

/// The `search` query parameter. Absent and blank are the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub search: Option<String>,
}

impl SearchQuery {
    pub fn new(search: Option<String>) -> Self {
        Self {
            search: search.filter(|value| !value.trim().is_empty()),
        }
    }

    pub fn value(&self) -> String {
        self.search.clone().unwrap_or_default()
    }
}

impl From<&str> for SearchQuery {
    fn from(query: &str) -> Self {
        Self::new(read_param(query, "search"))
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&write_param("", "search", self.search.as_deref()))
    }
}

impl Route {
    fn jobs() -> Self {
        Route::Jobs {
            query: SearchQuery::default(),
        }
    }

    fn landing(landing: Landing) -> Self {
        match landing {
            Landing::Home => Route::jobs(),
            Landing::EmployerDashboard => Route::Dashboard {},
            Landing::CreateCandidateProfile => Route::CreateCandidateProfile {},
            Landing::CreateEmployerProfile => Route::CreateEmployerProfile {},
            Landing::Login => Route::Login {},
        }
    }

    fn nav(item: NavItem) -> Self {
        match item {
            NavItem::Home | NavItem::FindJobs => Route::jobs(),
            NavItem::Login | NavItem::Logout => Route::Login {},
            NavItem::Register => Route::Register {},
            NavItem::MyApplications => Route::Applications {},
            NavItem::Applicants => Route::Applicants {
                query: SearchQuery::default(),
            },
            NavItem::PostJob => Route::PostJob {},
        }
    }
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    if let Err(err) = dioxus::logger::init(tracing::Level::INFO) {
        eprintln!("logger not installed: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        SessionProvider {
            Router::<Route> {}
        }
    }
}

/// Navbar above every page.
#[component]
fn Shell() -> Element {
    let nav = use_navigator();
    rsx! {
        Navbar {
            on_navigate: move |item| {
                nav.push(Route::nav(item));
            },
            Outlet::<Route> {}
        }
    }
}

/// Redirect `/` to `/jobs`
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::jobs());
    rsx! {}
}
