//! Failure type shared by every request and controller.

use serde::Deserialize;

use crate::form::FieldErrors;

/// Broad failure classes the views react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or rejected credential.
    Auth,
    /// The request never produced a response.
    Network,
    /// Local field validation; no request was sent.
    Validation,
    /// Any other non-2xx response. 4xx and 5xx are not told apart.
    Server,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed with status {status}")]
    Status { status: u16, body: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error("Not signed in")]
    Unauthenticated,
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
    #[error("No local entry with id {0}")]
    MissingEntry(String),
}

#[derive(Deserialize)]
struct DetailBody {
    detail: String,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Status { status, .. } if matches!(status, 401 | 403) => ErrorKind::Auth,
            ApiError::Unauthenticated => ErrorKind::Auth,
            ApiError::Transport(_) => ErrorKind::Network,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Status { .. } | ApiError::Decode(_) | ApiError::MissingEntry(_) => {
                ErrorKind::Server
            }
        }
    }

    /// HTTP status for server rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The API's `{"detail": "..."}` message, when the body carries one.
    pub fn detail(&self) -> Option<String> {
        match self {
            ApiError::Status { body, .. } => serde_json::from_str::<DetailBody>(body)
                .ok()
                .map(|b| b.detail),
            _ => None,
        }
    }

    /// Text for a general error banner.
    pub fn user_message(&self) -> String {
        if let Some(detail) = self.detail() {
            return detail;
        }
        match self.kind() {
            ErrorKind::Auth => "Please log in to continue.".to_string(),
            ErrorKind::Network => "Network error. Please try again.".to_string(),
            ErrorKind::Validation => "Please fix the highlighted fields.".to_string(),
            ErrorKind::Server => "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for ApiError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, body: &str) -> ApiError {
        ApiError::Status {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(status(401, "").kind(), ErrorKind::Auth);
        assert_eq!(status(403, "").kind(), ErrorKind::Auth);
        assert_eq!(status(404, "").kind(), ErrorKind::Server);
        assert_eq!(status(500, "").kind(), ErrorKind::Server);
        assert_eq!(ApiError::Unauthenticated.kind(), ErrorKind::Auth);
        assert_eq!(
            ApiError::Transport("reset".to_string()).kind(),
            ErrorKind::Network
        );
        assert_eq!(
            ApiError::Validation(FieldErrors::default()).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_detail_is_optional() {
        let err = status(400, r#"{"detail": "No active account found"}"#);
        assert_eq!(err.detail().as_deref(), Some("No active account found"));
        assert_eq!(err.user_message(), "No active account found");

        let err = status(500, "<html>oops</html>");
        assert!(err.detail().is_none());
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }

    #[test]
    fn test_not_found() {
        assert!(status(404, "").is_not_found());
        assert!(!status(200, "").is_not_found());
        assert!(!ApiError::Unauthenticated.is_not_found());
    }
}
