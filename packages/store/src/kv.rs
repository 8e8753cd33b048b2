//! # Key-value persistence seam
//!
//! The client keeps a tiny amount of state across reloads: the bearer token and
//! the role string returned at login. Everything reads and writes it through
//! [`KeyValueStore`], so the same session code runs against the browser's
//! `localStorage` ([`crate::LocalStore`]) or an in-process map
//! ([`crate::MemoryStore`]) in tests and native builds.
//!
//! Implementations swallow backend errors: an unavailable storage area reads as
//! "nothing stored", which the session layer treats as anonymous.

/// Synchronous string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}
