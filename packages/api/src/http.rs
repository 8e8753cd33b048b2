//! reqwest-backed [`Transport`]. On wasm32 reqwest drives the browser's
//! `fetch`; natively it uses rustls.

use tracing::instrument;

use crate::error::ApiError;
use crate::transport::{Body, HttpRequest, HttpResponse, Method, Multipart, Part, Transport};

#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn multipart_form(form: Multipart) -> Result<reqwest::multipart::Form, ApiError> {
    let mut out = reqwest::multipart::Form::new();
    for part in form.parts {
        out = match part {
            Part::Text { name, value } => out.text(name, value),
            Part::File { name, upload } => {
                let file = reqwest::multipart::Part::bytes(upload.bytes)
                    .file_name(upload.file_name)
                    .mime_str(&upload.content_type)?;
                out.part(name, file)
            }
        };
    }
    Ok(out)
}

impl Transport for HttpTransport {
    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(form) => builder.multipart(multipart_form(form)?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status, "response received");
        Ok(HttpResponse { status, body })
    }
}
