//! Scripted in-memory [`Transport`] for tests and offline demos.
//!
//! Replies are registered per `(method, path)`. A route with several replies
//! hands them out in order and then keeps repeating the last one, so a test can
//! script "DELETE succeeds, then the list no longer contains the entry". A
//! route path with a `?` matches the full path and query; without one it
//! matches any query.
//!
//! [`MockTransport::hold`] registers a reply that only resolves when the test
//! sends it, which is how overlapping requests are made to finish out of order.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::error::ApiError;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

enum Reply {
    Ready(Result<HttpResponse, ApiError>),
    Held(oneshot::Receiver<HttpResponse>),
}

struct Route {
    method: Method,
    path: String,
    replies: VecDeque<Reply>,
}

impl Route {
    fn matches(&self, method: Method, path: &str) -> bool {
        if self.method != method {
            return false;
        }
        if self.path.contains('?') {
            self.path == path
        } else {
            path.split('?').next() == Some(self.path.as_str())
        }
    }

    fn next_reply(&mut self) -> Option<Reply> {
        if self.replies.len() == 1 {
            if let Some(Reply::Ready(result)) = self.replies.front() {
                return Some(Reply::Ready(result.clone()));
            }
        }
        self.replies.pop_front()
    }
}

#[derive(Default)]
struct MockState {
    routes: Vec<Route>,
    log: Vec<HttpRequest>,
}

/// In-memory Transport with scripted replies and a request log.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("requests", &self.requests().len())
            .finish()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        match state
            .routes
            .iter_mut()
            .find(|route| route.method == method && route.path == path)
        {
            Some(route) => route.replies.push_back(reply),
            None => state.routes.push(Route {
                method,
                path: path.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
    }

    /// Reply with a JSON body.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.push(
            method,
            path,
            Reply::Ready(Ok(HttpResponse::json(status, &body))),
        );
    }

    /// Reply with a raw body (empty for 204s).
    pub fn respond_text(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(
            method,
            path,
            Reply::Ready(Ok(HttpResponse::new(status, body))),
        );
    }

    /// Fail at the transport level, as a dropped connection would.
    pub fn fail(&self, method: Method, path: &str, message: &str) {
        self.push(
            method,
            path,
            Reply::Ready(Err(ApiError::Transport(message.to_string()))),
        );
    }

    /// Register a reply that resolves when the returned sender fires.
    pub fn hold(&self, method: Method, path: &str) -> oneshot::Sender<HttpResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Reply::Held(rx));
        tx
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state
            .lock()
            .map(|state| state.log.clone())
            .unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests().pop()
    }

    /// Number of requests with this method whose path (ignoring the query)
    /// equals `path`.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path().split('?').next() == Some(path))
            .count()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let reply = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| ApiError::Transport("mock state poisoned".to_string()))?;
            let path = request.path().to_string();
            let method = request.method;
            state.log.push(request);
            state
                .routes
                .iter_mut()
                .find(|route| route.matches(method, &path))
                .and_then(Route::next_reply)
        };

        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Held(rx)) => rx
                .await
                .map_err(|_| ApiError::Transport("request aborted".to_string())),
            None => Ok(HttpResponse::new(404, r#"{"detail": "Not found."}"#)),
        }
    }
}
