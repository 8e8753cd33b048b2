//! Job postings and the drafts that create or edit them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::{FieldErrors, Validate};
use crate::sync::Entity;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    #[default]
    Remote,
    Onsite,
    Hybrid,
}

impl WorkMode {
    pub const ALL: [WorkMode; 3] = [WorkMode::Remote, WorkMode::Onsite, WorkMode::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Remote => "remote",
            WorkMode::Onsite => "onsite",
            WorkMode::Hybrid => "hybrid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkMode::Remote => "Remote",
            WorkMode::Onsite => "On-site",
            WorkMode::Hybrid => "Hybrid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    #[serde(rename = "full-time")]
    FullTime,
    #[serde(rename = "part-time")]
    PartTime,
    #[serde(rename = "contract")]
    Contract,
}

impl JobType {
    pub const ALL: [JobType; 3] = [JobType::FullTime, JobType::PartTime, JobType::Contract];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level",
            ExperienceLevel::Mid => "Mid Level",
            ExperienceLevel::Senior => "Senior Level",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == value)
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A job as served by `/jobs/`. Classification fields are optional because
/// older postings were created without them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub work_mode: Option<WorkMode>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

impl Entity for JobPosting {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl JobPosting {
    /// Local stand-in shown while a create is in flight. Negative ids never
    /// collide with server ids.
    pub fn placeholder(local_id: i64, draft: &JobDraft) -> Self {
        Self {
            id: -local_id.abs(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            location: draft.location.trim().to_string(),
            created_at: Utc::now(),
            work_mode: Some(draft.work_mode),
            job_type: Some(draft.job_type),
            experience_level: Some(draft.experience_level),
            salary: Some(draft.salary.clone()).filter(|s| !s.trim().is_empty()),
            company_name: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id < 0
    }

    /// Apply an edit locally.
    pub fn with_edit(&self, edit: &JobEdit) -> Self {
        Self {
            title: edit.title.clone(),
            location: edit.location.clone(),
            description: edit.description.clone(),
            ..self.clone()
        }
    }
}

/// Body of `POST /jobs/create/`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub experience_level: ExperienceLevel,
    pub work_mode: WorkMode,
    pub job_type: JobType,
    pub salary: String,
}

impl Validate for JobDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Job title is required");
        errors.require("location", &self.location, "Location is required");
        errors.require("description", &self.description, "Job description is required");
        errors.into_result()
    }
}

/// Body of `PATCH /jobs/:id/`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct JobEdit {
    pub title: String,
    pub location: String,
    pub description: String,
}

impl From<&JobPosting> for JobEdit {
    fn from(job: &JobPosting) -> Self {
        Self {
            title: job.title.clone(),
            location: job.location.clone(),
            description: job.description.clone(),
        }
    }
}

impl Validate for JobEdit {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Job title is required");
        errors.require("location", &self.location, "Location is required");
        errors.require("description", &self.description, "Job description is required");
        errors.into_result()
    }
}
