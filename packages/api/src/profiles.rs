//! # Profile endpoints
//!
//! Profiles are created lazily, so every editor first probes whether one
//! exists and remembers the answer as a [`ProfileStatus`]:
//!
//! - probe `2xx` → [`ProfileStatus::Exists`] → saves use `PUT`
//! - anything else (404, other rejections, network failures) →
//!   [`ProfileStatus::Missing`] → saves use `POST`
//!
//! A successful save always leaves the profile existing, so the save functions
//! return [`ProfileStatus::Exists`] for the editor to keep.

use std::fmt;

use futures::join;
use store::KeyValueStore;

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::form::FieldErrors;
use crate::models::{
    CandidateProfile, CandidateProfileDraft, Education, EmployerProfile, EmployerProfileDraft,
    Experience, Role,
};
use crate::transport::{Body, Method, Transport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileKind {
    Candidate,
    Employer,
}

impl ProfileKind {
    pub fn path(&self) -> &'static str {
        match self {
            ProfileKind::Candidate => "/auth/candidate/profile/",
            ProfileKind::Employer => "/auth/employer/profile/",
        }
    }
}

impl From<Role> for ProfileKind {
    fn from(role: Role) -> Self {
        match role {
            Role::Candidate => ProfileKind::Candidate,
            Role::Employer => ProfileKind::Employer,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProfileStatus {
    /// Not probed yet, or the probe failed.
    #[default]
    Missing,
    Exists,
}

impl ProfileStatus {
    pub fn save_method(&self) -> Method {
        match self {
            ProfileStatus::Missing => Method::Post,
            ProfileStatus::Exists => Method::Put,
        }
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileStatus::Missing => f.write_str("missing"),
            ProfileStatus::Exists => f.write_str("exists"),
        }
    }
}

pub async fn probe<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    kind: ProfileKind,
) -> ProfileStatus {
    match client
        .execute(Method::Get, kind.path(), Body::Empty, Auth::Required)
        .await
    {
        Ok(()) => ProfileStatus::Exists,
        Err(err) => {
            tracing::debug!(?kind, error = %err, "profile probe: treating as missing");
            ProfileStatus::Missing
        }
    }
}

pub async fn employer<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
) -> Result<EmployerProfile, ApiError> {
    client.get(ProfileKind::Employer.path()).await
}

pub async fn candidate<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
) -> Result<CandidateProfile, ApiError> {
    client.get(ProfileKind::Candidate.path()).await
}

pub async fn education<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
) -> Result<Vec<Education>, ApiError> {
    client.get("/auth/candidate/education/").await
}

pub async fn experience<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
) -> Result<Vec<Experience>, ApiError> {
    client.get("/auth/candidate/experience/").await
}

pub async fn add_education<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    entry: &Education,
) -> Result<(), ApiError> {
    let body = Body::Json(serde_json::to_value(entry)?);
    client
        .execute(Method::Post, "/auth/candidate/education/", body, Auth::Required)
        .await
}

pub async fn add_experience<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    entry: &Experience,
) -> Result<(), ApiError> {
    let body = Body::Json(serde_json::to_value(entry)?);
    client
        .execute(Method::Post, "/auth/candidate/experience/", body, Auth::Required)
        .await
}

pub async fn save_employer<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    status: ProfileStatus,
    draft: &EmployerProfileDraft,
) -> Result<ProfileStatus, ApiError> {
    client
        .execute(
            status.save_method(),
            ProfileKind::Employer.path(),
            Body::Multipart(draft.to_multipart()),
            Auth::Required,
        )
        .await?;
    Ok(ProfileStatus::Exists)
}

/// How far a candidate save got. Kept by the editor across attempts so a
/// retry after a partial failure updates the profile with `PUT` and only
/// resends the entries the server has not accepted yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CandidateProgress {
    pub profile: ProfileStatus,
    pub education_saved: bool,
    pub experience_saved: bool,
}

impl CandidateProgress {
    pub fn new(profile: ProfileStatus) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn is_partial(&self) -> bool {
        self.education_saved || self.experience_saved
    }
}

/// Save the profile, then the education entry, then the experience entry if
/// there is one. Stops at the first failure; `progress` records every step
/// that succeeded before it. After a complete save the entry flags are
/// cleared, so the next save adds new entries again.
pub async fn save_candidate<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    progress: &mut CandidateProgress,
    draft: &CandidateProfileDraft,
) -> Result<(), ApiError> {
    let education_entry = draft.education.to_entry().ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.insert("education", "Education details are incomplete");
        ApiError::Validation(errors)
    })?;
    let experience_entry = match &draft.experience {
        Some(experience) => Some(experience.to_entry().ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.insert("experience", "Experience details are incomplete");
            ApiError::Validation(errors)
        })?),
        None => None,
    };

    client
        .execute(
            progress.profile.save_method(),
            ProfileKind::Candidate.path(),
            Body::Multipart(draft.to_multipart()),
            Auth::Required,
        )
        .await?;
    progress.profile = ProfileStatus::Exists;

    if !progress.education_saved {
        add_education(client, &education_entry).await?;
        progress.education_saved = true;
    }
    if let Some(entry) = &experience_entry {
        if !progress.experience_saved {
            add_experience(client, entry).await?;
            progress.experience_saved = true;
        }
    }
    *progress = CandidateProgress::new(ProfileStatus::Exists);
    Ok(())
}

/// Everything the candidate profile page shows.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateOverview {
    pub profile: CandidateProfile,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
}

/// Load profile, education and experience concurrently. The sub-collections
/// degrade to empty lists; a missing profile is an error.
pub async fn candidate_overview<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
) -> Result<CandidateOverview, ApiError> {
    let (profile, education, experience) =
        join!(candidate(client), education(client), experience(client));
    Ok(CandidateOverview {
        profile: profile?,
        education: education.unwrap_or_default(),
        experience: experience.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::models::{EducationDraft, ExperienceDraft};
    use rstest::rstest;
    use serde_json::json;
    use store::{ClientConfig, MemoryStore};

    fn client(mock: &MockTransport) -> ApiClient<MockTransport, MemoryStore> {
        let client = ApiClient::new(mock.clone(), MemoryStore::new(), &ClientConfig::default());
        client.credentials().save("tok", "employer");
        client
    }

    #[rstest]
    #[case(404, Method::Post)]
    #[case(200, Method::Put)]
    #[case(500, Method::Post)]
    #[tokio::test]
    async fn test_probe_decides_save_method(#[case] probe_status: u16, #[case] expected: Method) {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/auth/employer/profile/", probe_status, json!({}));
        mock.respond(Method::Post, "/api/auth/employer/profile/", 201, json!({}));
        mock.respond(Method::Put, "/api/auth/employer/profile/", 200, json!({}));
        let client = client(&mock);

        let status = probe(&client, ProfileKind::Employer).await;
        let draft = EmployerProfileDraft {
            company_name: "Acme".to_string(),
            ..EmployerProfileDraft::default()
        };
        let next = save_employer(&client, status, &draft).await.unwrap();

        assert_eq!(mock.last_request().unwrap().method, expected);
        assert_eq!(next, ProfileStatus::Exists);
        assert_eq!(next.save_method(), Method::Put);
    }

    #[tokio::test]
    async fn test_probe_network_failure_is_missing() {
        let mock = MockTransport::new();
        mock.fail(Method::Get, "/api/auth/candidate/profile/", "offline");
        let client = client(&mock);
        assert_eq!(
            probe(&client, ProfileKind::Candidate).await,
            ProfileStatus::Missing
        );
    }

    fn candidate_draft(with_experience: bool) -> CandidateProfileDraft {
        CandidateProfileDraft {
            full_name: "Ada".to_string(),
            education: EducationDraft {
                institution: "UCL".to_string(),
                degree: "BSc".to_string(),
                start_year: "2018".to_string(),
                end_year: "2021".to_string(),
                is_current: false,
            },
            experience: with_experience.then(|| ExperienceDraft {
                company_name: "Acme".to_string(),
                role: "Engineer".to_string(),
                role_description: String::new(),
                start_date: "2021-09-01".to_string(),
                end_date: String::new(),
                is_current: true,
            }),
            ..CandidateProfileDraft::default()
        }
    }

    #[rstest]
    #[case(false, 0)]
    #[case(true, 1)]
    #[tokio::test]
    async fn test_candidate_save_sequence(#[case] with_experience: bool, #[case] experience_posts: usize) {
        let mock = MockTransport::new();
        mock.respond(Method::Post, "/api/auth/candidate/profile/", 201, json!({}));
        mock.respond(Method::Post, "/api/auth/candidate/education/", 201, json!({}));
        mock.respond(Method::Post, "/api/auth/candidate/experience/", 201, json!({}));
        let client = client(&mock);

        let mut progress = CandidateProgress::new(ProfileStatus::Missing);
        save_candidate(&client, &mut progress, &candidate_draft(with_experience))
            .await
            .unwrap();
        assert_eq!(progress, CandidateProgress::new(ProfileStatus::Exists));

        assert_eq!(mock.count(Method::Post, "/api/auth/candidate/profile/"), 1);
        assert_eq!(mock.count(Method::Post, "/api/auth/candidate/education/"), 1);
        assert_eq!(
            mock.count(Method::Post, "/api/auth/candidate/experience/"),
            experience_posts
        );
    }

    #[tokio::test]
    async fn test_candidate_save_stops_at_failed_profile() {
        let mock = MockTransport::new();
        mock.respond(Method::Put, "/api/auth/candidate/profile/", 400, json!({}));
        let client = client(&mock);

        let mut progress = CandidateProgress::new(ProfileStatus::Exists);
        let err = save_candidate(&client, &mut progress, &candidate_draft(true))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(mock.requests().len(), 1);
        assert!(!progress.is_partial());
    }

    #[tokio::test]
    async fn test_candidate_retry_after_failed_education() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, "/api/auth/candidate/profile/", 201, json!({}));
        mock.respond(Method::Post, "/api/auth/candidate/education/", 500, json!({}));
        mock.respond(Method::Post, "/api/auth/candidate/education/", 201, json!({}));
        mock.respond(Method::Put, "/api/auth/candidate/profile/", 200, json!({}));
        let client = client(&mock);
        let draft = candidate_draft(false);
        let mut progress = CandidateProgress::new(ProfileStatus::Missing);

        let err = save_candidate(&client, &mut progress, &draft).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(progress.profile, ProfileStatus::Exists);
        assert!(!progress.education_saved);

        save_candidate(&client, &mut progress, &draft).await.unwrap();
        assert_eq!(mock.count(Method::Post, "/api/auth/candidate/profile/"), 1);
        assert_eq!(mock.count(Method::Put, "/api/auth/candidate/profile/"), 1);
        assert_eq!(mock.count(Method::Post, "/api/auth/candidate/education/"), 2);
    }

    #[tokio::test]
    async fn test_candidate_retry_skips_saved_education() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, "/api/auth/candidate/profile/", 201, json!({}));
        mock.respond(Method::Put, "/api/auth/candidate/profile/", 200, json!({}));
        mock.respond(Method::Post, "/api/auth/candidate/education/", 201, json!({}));
        mock.respond(Method::Post, "/api/auth/candidate/experience/", 400, json!({}));
        mock.respond(Method::Post, "/api/auth/candidate/experience/", 201, json!({}));
        let client = client(&mock);
        let draft = candidate_draft(true);
        let mut progress = CandidateProgress::new(ProfileStatus::Missing);

        assert!(save_candidate(&client, &mut progress, &draft).await.is_err());
        assert!(progress.education_saved);
        assert!(!progress.experience_saved);

        save_candidate(&client, &mut progress, &draft).await.unwrap();
        assert_eq!(mock.count(Method::Post, "/api/auth/candidate/education/"), 1);
        assert_eq!(mock.count(Method::Post, "/api/auth/candidate/experience/"), 2);
        assert_eq!(mock.count(Method::Put, "/api/auth/candidate/profile/"), 1);
        assert!(!progress.is_partial());
    }

    #[tokio::test]
    async fn test_overview_tolerates_missing_sub_collections() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Get,
            "/api/auth/candidate/profile/",
            200,
            json!({"full_name": "Ada", "skills": [{"name": "Rust"}]}),
        );
        mock.respond(
            Method::Get,
            "/api/auth/candidate/education/",
            200,
            json!([{"institution": "UCL", "degree": "BSc", "start_year": 2018, "end_year": null}]),
        );
        let client = client(&mock);

        let overview = candidate_overview(&client).await.unwrap();
        assert_eq!(overview.profile.full_name, "Ada");
        assert!(overview.education[0].is_current());
        assert!(overview.experience.is_empty());
    }
}
