//! Session resolution and role gating.

mod permissions;
mod session;

pub use permissions::{permitted, Action};
pub use session::{Landing, Session, SessionState};
