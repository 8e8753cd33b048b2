//! Job applications as seen by the candidate who sent them and by the employer
//! who receives them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::{FieldErrors, Upload, Validate};
use crate::sync::Entity;
use crate::transport::Multipart;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    New,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "new",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "New",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One application. The candidate and employer listings serialize slightly
/// different subsets, so everything beyond `id` and `applied_at` defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    #[serde(default)]
    pub job: Option<i64>,
    #[serde(default)]
    pub candidate: Option<i64>,
    #[serde(default)]
    pub cover_letter: String,
    /// Media path of the uploaded resume (candidate listing).
    #[serde(default)]
    pub resume: Option<String>,
    /// Same file, as named by the employer listing.
    #[serde(default)]
    pub resume_url: Option<String>,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub job_location: Option<String>,
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub candidate_profile_image: Option<String>,
    #[serde(default)]
    pub candidate_profile_id: Option<i64>,
}

impl Entity for Application {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Application {
    pub fn resume_path(&self) -> Option<&str> {
        self.resume
            .as_deref()
            .or(self.resume_url.as_deref())
            .filter(|p| !p.is_empty())
    }

    pub fn with_status(&self, status: ApplicationStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Case-insensitive match on the display fields the applicant search
    /// covers.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.candidate_name, &self.job_title, &self.job_location]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Body of `PATCH /applications/employer/:id/`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

pub const MIN_COVER_LETTER_CHARS: usize = 30;

/// The apply form: a cover letter and a PDF resume.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplicationDraft {
    pub cover_letter: String,
    pub resume: Option<Upload>,
}

impl Validate for ApplicationDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.min_chars(
            "cover_letter",
            &self.cover_letter,
            MIN_COVER_LETTER_CHARS,
            "Cover letter must be at least 30 characters",
        );
        match &self.resume {
            None => errors.insert("resume", "Resume is required"),
            Some(upload) if !upload.is_pdf() => errors.insert("resume", "Only PDF files are allowed"),
            Some(_) => {}
        }
        errors.into_result()
    }
}

impl ApplicationDraft {
    /// Multipart body of `POST /applications/apply/:job/`.
    pub fn to_multipart(&self, job: i64) -> Multipart {
        Multipart::new()
            .text("coverLetter", self.cover_letter.clone())
            .file_opt("resume", self.resume.as_ref())
            .text("job", job.to_string())
    }
}
