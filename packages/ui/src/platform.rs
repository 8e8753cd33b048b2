//! Platform wiring: which key-value store keeps the credential and where the
//! API lives.
//!
//! | Build | Store | Config |
//! |-------|-------|--------|
//! | `web` on wasm32 | [`store::LocalStore`] (browser `localStorage`) | `JOBIFY_API_BASE_URL` at build time |
//! | native | [`store::MemoryStore`] (lost on exit) | `./jobify.toml`, then the build-time variable |

use api::{ApiClient, ClientConfig, HttpTransport, Session};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = store::LocalStore;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformStore = store::MemoryStore;

pub type AppClient = ApiClient<HttpTransport, PlatformStore>;
pub type AppSession = Session<HttpTransport, PlatformStore>;

pub fn load_config() -> ClientConfig {
    #[cfg(target_arch = "wasm32")]
    {
        ClientConfig::from_build_env()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = ClientConfig::filename();
        match std::fs::read_to_string(path) {
            Ok(text) => ClientConfig::from_toml(&text).unwrap_or_else(|err| {
                tracing::warn!(path, error = %err, "invalid config, using defaults");
                ClientConfig::from_build_env()
            }),
            Err(_) => ClientConfig::from_build_env(),
        }
    }
}

pub fn make_client() -> AppClient {
    let config = load_config();
    tracing::info!(base_url = config.base_url(), "api client configured");
    ApiClient::new(HttpTransport::new(), PlatformStore::new(), &config)
}
