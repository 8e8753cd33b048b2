//! Job posting endpoints.
//!
//! Browsing is public: list and detail send the credential when there is one
//! and work without it. Everything else requires an employer token.

use serde::Serialize;
use store::KeyValueStore;

use crate::client::{with_query, ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{JobDraft, JobEdit, JobPosting};
use crate::transport::{Body, Method, Transport};

#[derive(Serialize)]
pub(crate) struct SearchQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<&'a str>,
}

/// `GET /jobs/`, optionally filtered with `?search=`.
pub async fn list<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    search: Option<&str>,
) -> Result<Vec<JobPosting>, ApiError> {
    let path = with_query("/jobs/", &SearchQuery { search })?;
    client
        .json(Method::Get, &path, Body::Empty, Auth::Optional)
        .await
}

pub async fn get<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    id: i64,
) -> Result<JobPosting, ApiError> {
    client
        .json(Method::Get, &format!("/jobs/{id}/"), Body::Empty, Auth::Optional)
        .await
}

/// The signed-in employer's own postings.
pub async fn mine<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
) -> Result<Vec<JobPosting>, ApiError> {
    client.get("/jobs/my-jobs/").await
}

pub async fn create<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    draft: &JobDraft,
) -> Result<JobPosting, ApiError> {
    client.send_json(Method::Post, "/jobs/create/", draft).await
}

/// `PATCH /jobs/:id/` with title, location and description.
pub async fn update<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    id: i64,
    edit: &JobEdit,
) -> Result<(), ApiError> {
    let body = Body::Json(serde_json::to_value(edit)?);
    client
        .execute(Method::Patch, &format!("/jobs/{id}/"), body, Auth::Required)
        .await
}

/// Deleting a posting also deletes its applications server-side.
pub async fn delete<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    id: i64,
) -> Result<(), ApiError> {
    client
        .execute(
            Method::Delete,
            &format!("/jobs/delete/{id}/"),
            Body::Empty,
            Auth::Required,
        )
        .await
}

pub fn owns(own: &[JobPosting], id: i64) -> bool {
    own.iter().any(|job| job.id == id)
}

/// Whether posting `id` belongs to the signed-in employer. Anything that
/// stops the check reads as "not owned", so no edit controls are shown.
pub async fn is_owner<T: Transport, S: KeyValueStore>(client: &ApiClient<T, S>, id: i64) -> bool {
    match mine(client).await {
        Ok(own) => owns(&own, id),
        Err(err) => {
            tracing::debug!(error = %err, "ownership check failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::models::WorkMode;
    use crate::sync::{Collection, LoadOutcome};
    use serde_json::json;
    use store::{ClientConfig, MemoryStore};

    fn client(mock: &MockTransport) -> ApiClient<MockTransport, MemoryStore> {
        ApiClient::new(mock.clone(), MemoryStore::new(), &ClientConfig::default())
    }

    fn job(id: i64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "description": "",
            "location": "Remote",
            "created_at": "2024-05-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_anonymous_listing() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/jobs/", 200, json!([job(1, "Rust dev")]));
        let client = client(&mock);

        let jobs = list(&client, None).await.unwrap();
        assert_eq!(jobs.len(), 1);
        let request = mock.last_request().unwrap();
        assert_eq!(request.path(), "/api/jobs/");
        assert_eq!(request.header("authorization"), None);
    }

    #[tokio::test]
    async fn test_search_is_encoded() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/jobs/", 200, json!([]));
        let client = client(&mock);

        list(&client, Some("rust & go")).await.unwrap();
        assert_eq!(
            mock.last_request().unwrap().path(),
            "/api/jobs/?search=rust+%26+go"
        );
    }

    #[tokio::test]
    async fn test_create_posts_draft() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, "/api/jobs/create/", 201, job(12, "Designer"));
        let client = client(&mock);
        client.credentials().save("tok", "employer");

        let draft = JobDraft {
            title: "Designer".to_string(),
            location: "Remote".to_string(),
            description: "Figma".to_string(),
            work_mode: WorkMode::Hybrid,
            ..JobDraft::default()
        };
        let created = create(&client, &draft).await.unwrap();
        assert_eq!(created.id, 12);

        match mock.last_request().unwrap().body {
            Body::Json(body) => {
                assert_eq!(body["work_mode"], "hybrid");
                assert_eq!(body["job_type"], "full-time");
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_employer_paths() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/jobs/my-jobs/", 200, json!([job(3, "Ops")]));
        mock.respond(Method::Patch, "/api/jobs/3/", 200, job(3, "SRE"));
        mock.respond_text(Method::Delete, "/api/jobs/delete/3/", 204, "");
        let client = client(&mock);
        client.credentials().save("tok", "employer");

        assert_eq!(mine(&client).await.unwrap()[0].id, 3);
        update(
            &client,
            3,
            &JobEdit {
                title: "SRE".to_string(),
                location: "Remote".to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap();
        delete(&client, 3).await.unwrap();
        assert_eq!(mock.count(Method::Delete, "/api/jobs/delete/3/"), 1);
    }

    #[tokio::test]
    async fn test_failed_listing_renders_empty() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/jobs/", 502, json!({}));
        let client = client(&mock);
        let jobs: Collection<JobPosting> = Collection::new();

        let outcome = jobs.load(list(&client, None)).await;
        assert_eq!(outcome, LoadOutcome::Failed);
        let state = jobs.snapshot();
        assert!(state.items.is_empty());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_optimistic_edit_of_detail() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/jobs/5/", 200, job(5, "Old"));
        mock.respond(Method::Patch, "/api/jobs/5/", 400, json!({"detail": "nope"}));
        let client = client(&mock);
        client.credentials().save("tok", "employer");
        let detail: Collection<JobPosting> = Collection::new();

        detail
            .load(async { get(&client, 5).await.map(|job| vec![job]) })
            .await;
        let edit = JobEdit {
            title: "New".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
        };
        let err = detail
            .update(5, |job| job.with_edit(&edit), update(&client, 5, &edit))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "nope");
        assert_eq!(detail.items()[0].title, "Old");
    }

    #[tokio::test]
    async fn test_ownership_follows_own_postings() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/jobs/my-jobs/", 200, json!([job(5, "Ops")]));
        let client = client(&mock);
        client.credentials().save("tok", "employer");

        assert!(is_owner(&client, 5).await);
        assert!(!is_owner(&client, 6).await);
    }

    #[tokio::test]
    async fn test_ownership_check_failure_is_not_owned() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/jobs/my-jobs/", 403, json!({}));
        let client = client(&mock);
        client.credentials().save("tok", "employer");

        assert!(!is_owner(&client, 5).await);
    }
}
