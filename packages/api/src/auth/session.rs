//! # Session resolver
//!
//! One [`Session`] per application shell. It owns the stored credential and
//! publishes a [`SessionState`] through a `watch` channel.
//!
//! - [`Session::resolve`] runs once on mount. No token means anonymous without
//!   a request; otherwise one `GET /auth/role/`. Any failure resolves to
//!   anonymous (fail open to logged out) with no retry.
//! - [`Session::login`], [`Session::register`] and [`Session::logout`] are the
//!   only writers of the credential. Each bumps a generation counter so a
//!   resolution that started before them cannot overwrite their result.
//! - [`Session::teardown`] stops all further publishing.

use std::cell::Cell;
use std::rc::Rc;

use store::KeyValueStore;
use tokio::sync::watch;

use crate::auth::permissions::{permitted, Action};
use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{Identity, LoginRequest, RegisterRequest, Role, TokenResponse};
use crate::transport::{Body, Method, Transport};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Resolution has not finished. Not the same as anonymous.
    #[default]
    Loading,
    Anonymous,
    Authenticated(Identity),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn identity(&self) -> Option<Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(*identity),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }

    /// Whether controls for `action` should be rendered. Nothing beyond
    /// browsing is permitted while loading.
    pub fn can(&self, action: Action) -> bool {
        permitted(self.role(), action)
    }
}

/// Where to send the user after a credential was created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Landing {
    Home,
    EmployerDashboard,
    CreateCandidateProfile,
    CreateEmployerProfile,
    Login,
}

impl Landing {
    /// Decide from the profile-check response. The check answers 404 for an
    /// account that needs no onboarding; anything else, failures included,
    /// sends the user to profile creation.
    pub fn after_login(role: Role, check: &Result<(), ApiError>) -> Self {
        let onboarded = matches!(check, Err(err) if err.is_not_found());
        match (role, onboarded) {
            (Role::Candidate, true) => Landing::Home,
            (Role::Employer, true) => Landing::EmployerDashboard,
            (Role::Candidate, false) => Landing::CreateCandidateProfile,
            (Role::Employer, false) => Landing::CreateEmployerProfile,
        }
    }
}

struct SessionInner<T, S: KeyValueStore> {
    client: ApiClient<T, S>,
    state: watch::Sender<SessionState>,
    generation: Cell<u64>,
    alive: Cell<bool>,
}

pub struct Session<T, S: KeyValueStore> {
    inner: Rc<SessionInner<T, S>>,
}

impl<T, S: KeyValueStore> Clone for Session<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, S: KeyValueStore> PartialEq for Session<T, S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Transport, S: KeyValueStore> Session<T, S> {
    pub fn new(client: ApiClient<T, S>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            inner: Rc::new(SessionInner {
                client,
                state,
                generation: Cell::new(0),
                alive: Cell::new(true),
            }),
        }
    }

    pub fn client(&self) -> &ApiClient<T, S> {
        &self.inner.client
    }

    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Stop publishing. Pending resolutions settle silently.
    pub fn teardown(&self) {
        self.inner.alive.set(false);
    }

    fn publish(&self, state: SessionState) {
        if self.inner.alive.get() {
            self.inner.state.send_replace(state);
        }
    }

    fn bump(&self) -> u64 {
        let next = self.inner.generation.get() + 1;
        self.inner.generation.set(next);
        next
    }

    /// Resolve the stored credential into an identity.
    pub async fn resolve(&self) -> SessionState {
        let generation = self.bump();

        if self.inner.client.credentials().token().is_none() {
            self.publish(SessionState::Anonymous);
            return SessionState::Anonymous;
        }

        self.publish(SessionState::Loading);
        let resolved = match self.inner.client.get::<Identity>("/auth/role/").await {
            Ok(identity) => SessionState::Authenticated(identity),
            Err(err) => {
                tracing::warn!(error = %err, "identity resolution failed, continuing anonymous");
                SessionState::Anonymous
            }
        };

        if generation != self.inner.generation.get() {
            tracing::debug!("credential changed during resolution, result dropped");
            return self.state();
        }
        self.publish(resolved);
        resolved
    }

    /// Exchange username and password for a credential, then pick the
    /// landing page from the profile check.
    pub async fn login(&self, request: &LoginRequest) -> Result<Landing, ApiError> {
        let body = Body::Json(serde_json::to_value(request)?);
        let token: TokenResponse = self
            .inner
            .client
            .json(Method::Post, "/auth/login/", body, Auth::None)
            .await?;
        self.store(&token);

        let check = self
            .inner
            .client
            .execute(
                Method::Get,
                &format!("/auth/{}/profile/check/", token.role),
                Body::Empty,
                Auth::Required,
            )
            .await;
        let landing = Landing::after_login(token.role, &check);
        tracing::info!(role = %token.role, ?landing, "logged in");
        Ok(landing)
    }

    /// Create an account. The returned credential is stored and the user
    /// continues on the login page.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Landing, ApiError> {
        let body = Body::Json(serde_json::to_value(request)?);
        let token: TokenResponse = self
            .inner
            .client
            .json(Method::Post, "/auth/register/", body, Auth::None)
            .await?;
        self.store(&token);
        tracing::info!(role = %token.role, "registered");
        Ok(Landing::Login)
    }

    fn store(&self, token: &TokenResponse) {
        self.bump();
        self.inner
            .client
            .credentials()
            .save(&token.access, token.role.as_str());
        self.publish(SessionState::Authenticated(Identity { role: token.role }));
    }

    /// Destroy the credential and publish the anonymous state.
    pub fn logout(&self) {
        self.bump();
        self.inner.client.credentials().clear();
        self.publish(SessionState::Anonymous);
        tracing::info!("logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use rstest::rstest;
    use serde_json::json;
    use store::{ClientConfig, MemoryStore};

    fn session(mock: &MockTransport) -> Session<MockTransport, MemoryStore> {
        Session::new(ApiClient::new(
            mock.clone(),
            MemoryStore::new(),
            &ClientConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_no_token_is_anonymous_without_request() {
        let mock = MockTransport::new();
        let session = session(&mock);
        assert!(session.state().is_loading());

        assert_eq!(session.resolve().await, SessionState::Anonymous);
        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(mock.requests().is_empty());
        assert!(session.state().can(Action::BrowseJobs));
        assert!(!session.state().can(Action::Apply));
    }

    #[tokio::test]
    async fn test_token_resolves_role() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/auth/role/", 200, json!({"role": "candidate"}));
        let session = session(&mock);
        session.client().credentials().save("tok", "candidate");

        let state = session.resolve().await;
        assert_eq!(state.role(), Some(Role::Candidate));
        assert_eq!(
            mock.last_request().unwrap().header("Authorization"),
            Some("Bearer tok")
        );
    }

    #[rstest]
    #[case::unauthorized(401)]
    #[case::server_error(500)]
    #[tokio::test]
    async fn test_rejected_token_fails_open(#[case] status: u16) {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/auth/role/", status, json!({"detail": "bad"}));
        let session = session(&mock);
        session.client().credentials().save("expired", "employer");

        assert_eq!(session.resolve().await, SessionState::Anonymous);
        assert_eq!(mock.count(Method::Get, "/api/auth/role/"), 1);
    }

    #[tokio::test]
    async fn test_network_failure_fails_open() {
        let mock = MockTransport::new();
        mock.fail(Method::Get, "/api/auth/role/", "offline");
        let session = session(&mock);
        session.client().credentials().save("tok", "employer");

        assert_eq!(session.resolve().await, SessionState::Anonymous);
    }

    #[rstest]
    #[case(Role::Candidate, 404, Landing::Home)]
    #[case(Role::Employer, 404, Landing::EmployerDashboard)]
    #[case(Role::Candidate, 200, Landing::CreateCandidateProfile)]
    #[case(Role::Employer, 200, Landing::CreateEmployerProfile)]
    #[case(Role::Employer, 500, Landing::CreateEmployerProfile)]
    #[tokio::test]
    async fn test_login_landing(
        #[case] role: Role,
        #[case] check_status: u16,
        #[case] expected: Landing,
    ) {
        let mock = MockTransport::new();
        mock.respond(
            Method::Post,
            "/api/auth/login/",
            200,
            json!({"access": "new-token", "role": role}),
        );
        mock.respond(
            Method::Get,
            &format!("/api/auth/{role}/profile/check/"),
            check_status,
            json!({}),
        );
        let session = session(&mock);

        let landing = session
            .login(&LoginRequest {
                username: "ada".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(landing, expected);
        assert_eq!(session.state().role(), Some(role));
        let credentials = session.client().credentials();
        assert_eq!(credentials.token().as_deref(), Some("new-token"));
        assert_eq!(credentials.role().as_deref(), Some(role.as_str()));
        assert_eq!(
            mock.last_request().unwrap().header("authorization"),
            Some("Bearer new-token")
        );
    }

    #[tokio::test]
    async fn test_failed_login_keeps_anonymous() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Post,
            "/api/auth/login/",
            401,
            json!({"detail": "No active account found with the given credentials"}),
        );
        let session = session(&mock);
        session.resolve().await;

        let err = session.login(&LoginRequest::default()).await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "No active account found with the given credentials"
        );
        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(session.client().credentials().token().is_none());
    }

    #[tokio::test]
    async fn test_register_stores_token_and_lands_on_login() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Post,
            "/api/auth/register/",
            201,
            json!({"access": "fresh", "role": "employer"}),
        );
        let session = session(&mock);

        let landing = session
            .register(&RegisterRequest {
                username: "acme".to_string(),
                email: "hr@acme.test".to_string(),
                password: "pw".to_string(),
                role: Role::Employer,
            })
            .await
            .unwrap();

        assert_eq!(landing, Landing::Login);
        assert_eq!(session.client().credentials().token().as_deref(), Some("fresh"));
        let request = mock.last_request().unwrap();
        match request.body {
            Body::Json(body) => assert_eq!(body["role"], "employer"),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_logout_publishes_anonymous() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/auth/role/", 200, json!({"role": "employer"}));
        let session = session(&mock);
        session.client().credentials().save("tok", "employer");
        session.resolve().await;
        let mut rx = session.subscribe();
        rx.borrow_and_update();

        session.logout();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::Anonymous);
        assert!(session.client().credentials().token().is_none());
    }

    #[tokio::test]
    async fn test_logout_during_resolution_wins() {
        let mock = MockTransport::new();
        let reply = mock.hold(Method::Get, "/api/auth/role/");
        let session = session(&mock);
        session.client().credentials().save("tok", "candidate");

        let resolving = session.resolve();
        let interrupt = async {
            tokio::task::yield_now().await;
            session.logout();
            let _ = reply.send(crate::transport::HttpResponse::new(200, r#"{"role":"candidate"}"#));
        };
        let (state, ()) = tokio::join!(resolving, interrupt);

        assert_eq!(state, SessionState::Anonymous);
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_teardown_stops_publishing() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/auth/role/", 200, json!({"role": "employer"}));
        let session = session(&mock);
        session.client().credentials().save("tok", "employer");

        session.teardown();
        session.resolve().await;
        assert!(session.state().is_loading());
    }
}
