//! Shared Dioxus UI for the Jobify client.
//!
//! Views receive navigation as callbacks; the platform crate maps them to
//! routes. Controllers from `api` reach components through the hooks in
//! [`hooks`], and the session through [`use_session`].

mod hooks;
pub use hooks::{
    read_upload, use_collection, use_form, use_search_collection, use_watch, UseCollection,
    UseForm, UseSearchCollection,
};

mod navbar;
pub use navbar::{nav_items, NavItem, Navbar};

mod platform;
pub use platform::{load_config, make_client, AppClient, AppSession, PlatformStore};

mod session;
pub use session::{use_session, SessionContext, SessionProvider};

pub mod views;
