//! Bearer credential persistence.
//!
//! [`CredentialStore`] is the only code that knows which storage keys hold the
//! session. The token is created at login/registration and destroyed at logout;
//! its absence means the visitor is anonymous.

use crate::config::SessionConfig;
use crate::kv::KeyValueStore;

/// Typed access to the persisted token and role string.
#[derive(Clone, Debug)]
pub struct CredentialStore<S: KeyValueStore> {
    store: S,
    keys: SessionConfig,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_keys(store, SessionConfig::default())
    }

    pub fn with_keys(store: S, keys: SessionConfig) -> Self {
        Self { store, keys }
    }

    /// The stored bearer token. Blank values count as absent.
    pub fn token(&self) -> Option<String> {
        self.store
            .get(&self.keys.token_key)
            .filter(|token| !token.trim().is_empty())
    }

    /// The role string saved at login. Informational only; the session
    /// resolves the authoritative role from the API.
    pub fn role(&self) -> Option<String> {
        self.store.get(&self.keys.role_key)
    }

    pub fn save(&self, token: &str, role: &str) {
        self.store.set(&self.keys.token_key, token);
        self.store.set(&self.keys.role_key, role);
    }

    pub fn clear(&self) {
        self.store.remove(&self.keys.token_key);
        self.store.remove(&self.keys.role_key);
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}
