//! Wire models and form drafts.

mod account;
mod application;
mod job;
mod profile;

pub use account::{Identity, LoginRequest, RegisterRequest, Role, TokenResponse};
pub use application::{
    Application, ApplicationDraft, ApplicationStatus, StatusUpdate, MIN_COVER_LETTER_CHARS,
};
pub use job::{ExperienceLevel, JobDraft, JobEdit, JobPosting, JobType, WorkMode};
pub use profile::{
    CandidateProfile, CandidateProfileDraft, Education, EducationDraft, EmployerProfile,
    EmployerProfileDraft, Experience, ExperienceDraft, Skill,
};
