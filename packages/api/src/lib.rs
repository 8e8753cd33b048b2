//! # API crate: session and data-sync layer for the Jobify client
//!
//! Everything between the views and the REST API lives here. Views never
//! build URLs or read the credential themselves; they drive the controllers
//! below and subscribe to their state.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Session resolution (credential → role), login/register/logout, role permissions |
//! | [`client`] | Authorized fetch client: bearer header, status normalisation, JSON decoding |
//! | [`sync`] | Collection controller: loads, optimistic update/remove/create with rollback |
//! | [`filter`] | Two-way binding between a search box and one URL query parameter |
//! | [`form`] | Form controller: validation, submit state machine, file uploads |
//! | [`models`] | Wire models and drafts |
//! | [`jobs`], [`applications`], [`profiles`], [`dashboard`] | Typed endpoint functions |
//! | [`transport`] | The I/O seam, with [`HttpTransport`] (reqwest) and [`MockTransport`] (tests) |
//!
//! ## Concurrency
//!
//! All controllers are `Rc`-based and meant for a single-threaded UI loop.
//! Network calls are the only suspension points. Each controller carries an
//! alive flag (results after teardown are dropped) and, where loads can
//! overlap, a monotonic request ticket (the newest load wins).

pub mod applications;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod form;
mod http;
pub mod jobs;
mod mock;
pub mod models;
pub mod profiles;
pub mod sync;
pub mod transport;

pub use auth::{Action, Landing, Session, SessionState};
pub use client::{ApiClient, Auth};
pub use error::{ApiError, ErrorKind};
pub use filter::{QueryBinding, Refetch};
pub use form::{FieldErrors, FormController, FormKind, FormState, FormStatus, Upload, Validate};
pub use http::HttpTransport;
pub use mock::MockTransport;
pub use models::{Identity, Role};
pub use profiles::{ProfileKind, ProfileStatus};
pub use store::{ClientConfig, KeyValueStore, MemoryStore};
pub use sync::{Collection, Entity, LoadOutcome, Phase, SyncState};
pub use transport::{Method, Transport};
