//! # Browser `localStorage` backend
//!
//! [`LocalStore`] is the [`KeyValueStore`] used on the **web platform**. It is a
//! zero-size handle that looks up `window.localStorage` on every call; the
//! browser keeps the storage area alive, so there is nothing to cache.
//!
//! Every failure (no window, storage disabled by privacy settings, quota
//! exceeded) is logged and otherwise ignored. Reads then return `None` and the
//! user appears logged out instead of the app crashing.

use crate::kv::KeyValueStore;

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        match window.local_storage() {
            Ok(storage) => storage,
            Err(_) => {
                tracing::warn!("localStorage is not available");
                None
            }
        }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = self.storage() {
            if storage.set_item(key, value).is_err() {
                tracing::warn!(key, "failed to write to localStorage");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            if storage.remove_item(key).is_err() {
                tracing::warn!(key, "failed to remove from localStorage");
            }
        }
    }
}
