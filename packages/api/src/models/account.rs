//! # Accounts and roles
//!
//! - [`Role`] is the only thing the client knows about the signed-in user. It
//!   comes from `GET /auth/role/` as `{"role": "candidate" | "employer"}`.
//! - [`Identity`] wraps it so new identity fields can be added without
//!   touching every match on `Role`.
//! - [`LoginRequest`] and [`RegisterRequest`] are the two drafts that create a
//!   credential; both answer with a [`TokenResponse`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::form::{FieldErrors, Validate};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Candidate,
    Employer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Employer => "employer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "candidate" => Some(Role::Candidate),
            "employer" => Some(Role::Employer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved user behind the stored credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub role: Role,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("username", &self.username, "Username is required");
        errors.require("password", &self.password, "Password is required");
        errors.into_result()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("username", &self.username, "Username is required");
        errors.require("email", &self.email, "Email is required");
        if !self.email.trim().is_empty() && !self.email.contains('@') {
            errors.insert("email", "Enter a valid email address");
        }
        errors.require("password", &self.password, "Password is required");
        errors.into_result()
    }
}

/// Body of a successful login or registration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        let identity: Identity = serde_json::from_str(r#"{"role": "employer"}"#).unwrap();
        assert_eq!(identity.role, Role::Employer);
        assert_eq!(
            serde_json::to_string(&Role::Candidate).unwrap(),
            r#""candidate""#
        );
        assert!(serde_json::from_str::<Identity>(r#"{"role": "admin"}"#).is_err());
        assert_eq!(Role::parse("employer"), Some(Role::Employer));
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_register_requires_email_shape() {
        let draft = RegisterRequest {
            username: "ada".to_string(),
            email: "ada.example.com".to_string(),
            password: "secret".to_string(),
            role: Role::Candidate,
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Enter a valid email address"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LoginRequest::default().validate().unwrap_err();
        assert!(errors.contains("username"));
        assert!(errors.contains("password"));
    }
}
