//! # Form submission controller
//!
//! A [`FormController`] owns one draft and walks it through
//! `Idle → Submitting → Success | Error`. Both terminal states return to `Idle`
//! on the next submit attempt.
//!
//! - Validation is local and pure ([`Validate`]). A failing draft gets
//!   per-field messages and never reaches the network.
//! - A submit while another is in flight is ignored, so a double click sends
//!   one request.
//! - On success a [`FormKind::Create`] form resets its draft, a
//!   [`FormKind::Edit`] form keeps it, and the caller's continuation runs.
//! - On failure the draft is kept and a general message is shown.
//!
//! State is published through a `tokio::sync::watch` channel; views subscribe
//! and re-render on every transition. The controller is `!Send` and cheap to
//! clone (clones share state), matching the single-threaded UI loop.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use tokio::sync::watch;

use crate::error::ApiError;

/// Per-field validation messages, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message. The first message for a field wins.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Require a non-blank value.
    pub fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.insert(field, message);
        }
    }

    /// Require at least `min` characters (not bytes).
    pub fn min_chars(&mut self, field: &str, value: &str, min: usize, message: &str) {
        if value.trim().chars().count() < min {
            self.insert(field, message);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Schema check for a draft.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// A picked file, held in memory until submission.
#[derive(Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    /// Content type is inferred from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn with_content_type(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == "application/pdf"
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Accept only PDF documents (resumes).
    pub fn accept_pdf(self) -> Result<Self, &'static str> {
        if self.is_pdf() {
            Ok(self)
        } else {
            Err("Only PDF files are allowed")
        }
    }

    /// Accept only images (logos, profile pictures).
    pub fn accept_image(self) -> Result<Self, &'static str> {
        if self.is_image() {
            Ok(self)
        } else {
            Err("Please upload a valid image file")
        }
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    /// Draft resets after a successful submit.
    Create,
    /// Draft is kept after a successful submit.
    Edit,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormState<D> {
    pub draft: D,
    pub status: FormStatus,
    pub field_errors: FieldErrors,
}

impl<D> FormState<D> {
    pub fn is_submitting(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            FormStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field)
    }
}

struct FormInner<D> {
    kind: FormKind,
    alive: Cell<bool>,
    state: watch::Sender<FormState<D>>,
}

pub struct FormController<D> {
    inner: Rc<FormInner<D>>,
}

impl<D> Clone for FormController<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<D> PartialEq for FormController<D> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<D: Validate + Clone + Default + 'static> FormController<D> {
    pub fn new(kind: FormKind, draft: D) -> Self {
        let (state, _) = watch::channel(FormState {
            draft,
            status: FormStatus::Idle,
            field_errors: FieldErrors::default(),
        });
        Self {
            inner: Rc::new(FormInner {
                kind,
                alive: Cell::new(true),
                state,
            }),
        }
    }

    /// A create-form starting from the default draft.
    pub fn create() -> Self {
        Self::new(FormKind::Create, D::default())
    }

    /// An edit-form starting from an existing value.
    pub fn edit(draft: D) -> Self {
        Self::new(FormKind::Edit, draft)
    }

    pub fn kind(&self) -> FormKind {
        self.inner.kind
    }

    pub fn state(&self) -> FormState<D> {
        self.inner.state.borrow().clone()
    }

    pub fn draft(&self) -> D {
        self.inner.state.borrow().draft.clone()
    }

    pub fn status(&self) -> FormStatus {
        self.inner.state.borrow().status.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState<D>> {
        self.inner.state.subscribe()
    }

    fn modify(&self, f: impl FnOnce(&mut FormState<D>)) {
        self.inner.state.send_modify(f);
    }

    /// Edit the draft in place.
    pub fn update(&self, f: impl FnOnce(&mut D)) {
        self.modify(|state| f(&mut state.draft));
    }

    /// Swap in a new draft, e.g. after fetching the entity an edit-form
    /// works on.
    pub fn replace(&self, draft: D) {
        self.modify(|state| {
            state.draft = draft;
            state.field_errors = FieldErrors::default();
        });
    }

    /// Reset to the default draft and idle status.
    pub fn reset(&self) {
        self.modify(|state| {
            state.draft = D::default();
            state.status = FormStatus::Idle;
            state.field_errors = FieldErrors::default();
        });
    }

    /// Record a field error raised outside `validate`, such as a rejected
    /// file type at pick time.
    pub fn set_field_error(&self, field: &str, message: &str) {
        self.modify(|state| {
            state.field_errors.remove(field);
            state.field_errors.insert(field, message);
        });
    }

    pub fn clear_field_error(&self, field: &str) {
        self.modify(|state| state.field_errors.remove(field));
    }

    /// Run validation and publish the field errors. Returns `true` when the
    /// draft is valid.
    pub fn validate(&self) -> bool {
        let errors = match self.draft().validate() {
            Ok(()) => FieldErrors::default(),
            Err(errors) => errors,
        };
        let valid = errors.is_empty();
        self.modify(|state| state.field_errors = errors);
        valid
    }

    /// Stop applying results; in-flight submissions settle silently.
    pub fn detach(&self) {
        self.inner.alive.set(false);
    }

    pub fn is_attached(&self) -> bool {
        self.inner.alive.get()
    }

    /// Validate and send the draft.
    ///
    /// Returns the response when the submission succeeded and the form is
    /// still attached. Returns `None` when the call was ignored (already
    /// submitting), rejected locally, or failed remotely; the outcome is in
    /// [`FormController::state`].
    pub async fn submit<R, F, Fut>(&self, send: F, on_success: impl FnOnce(&R)) -> Option<R>
    where
        F: FnOnce(D) -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        if self.status() == FormStatus::Submitting {
            tracing::debug!("submit ignored, already submitting");
            return None;
        }

        let draft = self.draft();
        if let Err(errors) = draft.validate() {
            tracing::debug!(%errors, "draft rejected by validation");
            self.modify(|state| {
                state.status = FormStatus::Idle;
                state.field_errors = errors;
            });
            return None;
        }

        self.modify(|state| {
            state.status = FormStatus::Submitting;
            state.field_errors = FieldErrors::default();
        });

        let result = send(draft).await;

        if !self.is_attached() {
            tracing::debug!("form detached before the submission settled");
            return None;
        }

        match result {
            Ok(response) => {
                let kind = self.inner.kind;
                self.modify(|state| {
                    state.status = FormStatus::Success;
                    if kind == FormKind::Create {
                        state.draft = D::default();
                    }
                });
                on_success(&response);
                Some(response)
            }
            Err(err) => {
                tracing::warn!(error = %err, "form submission failed");
                let message = err.user_message();
                self.modify(|state| {
                    if let ApiError::Validation(errors) = err {
                        state.field_errors = errors;
                    }
                    state.status = FormStatus::Error(message);
                });
                None
            }
        }
    }
}
