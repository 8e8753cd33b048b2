//! # Authorized fetch client
//!
//! [`ApiClient`] is the only code that builds URLs, attaches the bearer
//! credential and interprets status codes. Everything above it (session,
//! controllers, resource functions) deals in typed values and [`ApiError`].
//!
//! - Endpoints are addressed by their path under `<base_url>/api`, e.g.
//!   `/jobs/` or `/applications/employer/42/`.
//! - A status outside `200..=299` becomes [`ApiError::Status`] with the raw
//!   body kept for [`ApiError::detail`].
//! - No retry, timeout or queueing. Each call is independent.

use serde::de::DeserializeOwned;
use serde::Serialize;
use store::{ClientConfig, CredentialStore, KeyValueStore};

use crate::error::ApiError;
use crate::transport::{Body, HttpRequest, HttpResponse, Method, Transport};

/// Whether a request carries the stored credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Auth {
    /// Attach the token when one is stored; send anonymously otherwise.
    Optional,
    /// Fail with [`ApiError::Unauthenticated`] without sending when no token
    /// is stored.
    Required,
    /// Never attach the token.
    None,
}

#[derive(Clone, Debug)]
pub struct ApiClient<T, S: KeyValueStore> {
    transport: T,
    credentials: CredentialStore<S>,
    base_url: String,
}

impl<T: Transport, S: KeyValueStore> ApiClient<T, S> {
    pub fn new(transport: T, store: S, config: &ClientConfig) -> Self {
        Self {
            transport,
            credentials: CredentialStore::with_keys(store, config.session.clone()),
            base_url: config.base_url().to_string(),
        }
    }

    pub fn credentials(&self) -> &CredentialStore<S> {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Absolute URL for a media path the API returns (resume, logo). Values
    /// that are already absolute pass through.
    pub fn media_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Send one request and return the raw response. Non-2xx is an error.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Body,
        auth: Auth,
    ) -> Result<HttpResponse, ApiError> {
        let mut headers = Vec::new();
        let token = match auth {
            Auth::None => None,
            Auth::Optional => self.credentials.token(),
            Auth::Required => Some(self.credentials.token().ok_or(ApiError::Unauthenticated)?),
        };
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        tracing::debug!(%method, path, "api request");
        let response = self
            .transport
            .send(HttpRequest {
                method,
                url: self.url(path),
                headers,
                body,
            })
            .await?;

        if response.is_success() {
            Ok(response)
        } else {
            tracing::debug!(%method, path, status = response.status, "api request rejected");
            Err(ApiError::Status {
                status: response.status,
                body: response.body,
            })
        }
    }

    /// Send a request and decode the JSON response body.
    pub async fn json<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
        auth: Auth,
    ) -> Result<R, ApiError> {
        let response = self.request(method, path, body, auth).await?;
        serde_json::from_str(&response.body).map_err(|err| {
            tracing::error!(%method, path, error = %err, "undecodable response body");
            ApiError::from(err)
        })
    }

    /// Send a request whose response body is ignored (e.g. 204 No Content).
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Body,
        auth: Auth,
    ) -> Result<(), ApiError> {
        self.request(method, path, body, auth).await.map(|_| ())
    }

    /// Authorized GET.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.json(Method::Get, path, Body::Empty, Auth::Required)
            .await
    }

    /// Authorized request with a JSON body.
    pub async fn send_json<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
    ) -> Result<R, ApiError> {
        let body = Body::Json(serde_json::to_value(payload)?);
        self.json(method, path, body, Auth::Required).await
    }
}

/// Append a urlencoded query to `path`. Returns `path` unchanged when the
/// query serializes to nothing (all fields `None`).
pub fn with_query<Q: Serialize>(path: &str, query: &Q) -> Result<String, ApiError> {
    let encoded = serde_urlencoded::to_string(query)?;
    if encoded.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{path}?{encoded}"))
    }
}
