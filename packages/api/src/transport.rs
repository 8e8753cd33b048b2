//! # Transport seam
//!
//! [`Transport`] is the single suspension point for network I/O. The
//! [`ApiClient`](crate::ApiClient) builds an [`HttpRequest`], hands it to the
//! transport and gets back the raw status and body. Status handling, bearer
//! headers and JSON decoding all live above this trait, so a transport only has
//! to move bytes.
//!
//! | Implementation | Used by |
//! |----------------|---------|
//! | [`HttpTransport`](crate::HttpTransport) | the application (reqwest; browser `fetch` on wasm32) |
//! | [`MockTransport`](crate::MockTransport) | tests (scripted replies, request log) |
//!
//! Futures are not required to be `Send`: the client runs on a single-threaded
//! UI event loop.

use std::fmt;

use crate::error::ApiError;
use crate::form::Upload;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a multipart form.
#[derive(Clone, Debug, PartialEq)]
pub enum Part {
    Text { name: String, value: String },
    File { name: String, upload: Upload },
}

/// Ordered multipart form. Repeated names are allowed (e.g. one `skills` field
/// per skill).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Multipart {
    pub parts: Vec<Part>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push(Part::Text {
            name: name.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn file(mut self, name: &str, upload: Upload) -> Self {
        self.parts.push(Part::File {
            name: name.to_string(),
            upload,
        });
        self
    }

    /// Add a file part only when one was picked.
    pub fn file_opt(self, name: &str, upload: Option<&Upload>) -> Self {
        match upload {
            Some(upload) => self.file(name, upload.clone()),
            None => self,
        }
    }

    /// First text value for `name`.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            Part::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// All text values for `name`, in insertion order.
    pub fn text_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.parts.iter().filter_map(move |part| match part {
            Part::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn upload(&self, name: &str) -> Option<&Upload> {
        self.parts.iter().find_map(|part| match part {
            Part::File { name: n, upload } if n == name => Some(upload),
            _ => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    Multipart(Multipart),
}

/// A fully resolved request: absolute URL, headers already attached.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Path and query of the URL, without scheme and host.
    pub fn path(&self) -> &str {
        let rest = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        match rest.find('/') {
            Some(idx) => &rest[idx..],
            None => "/",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Async transport for a single request/response exchange.
pub trait Transport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, ApiError>>;
}
