//! # Client configuration (`jobify.toml`)
//!
//! Defines where the REST API lives and which storage keys hold the session.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"   # endpoints live under <base_url>/api/
//!
//! [session]
//! token_key = "access_token"
//! role_key = "role"
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`ClientConfig`] | Top-level config. TOML (de)serialisation, build-time environment override, canonical filename. |
//! | [`ApiConfig`] | API section, the base URL without the `/api` suffix. |
//! | [`SessionConfig`] | Storage keys for the bearer token and the role string. |
//!
//! All structs derive `Default` so that a missing or empty file is the default
//! configuration.

use serde::{Deserialize, Serialize};

/// Top-level client configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// REST API location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host of the API server, e.g. `https://api.example.com`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Keys used in the persistent key-value store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_token_key")]
    pub token_key: String,
    #[serde(default = "default_role_key")]
    pub role_key: String,
}

fn default_token_key() -> String {
    "access_token".to_string()
}

fn default_role_key() -> String {
    "role".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: default_token_key(),
            role_key: default_role_key(),
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at the given API server.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
            },
            session: SessionConfig::default(),
        }
    }

    /// Default config with the base URL taken from `JOBIFY_API_BASE_URL` when
    /// it was set during the build.
    pub fn from_build_env() -> Self {
        match option_env!("JOBIFY_API_BASE_URL") {
            Some(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "jobify.toml"
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
