//! Application endpoints for both sides of the board.
//!
//! | Caller | Endpoint |
//! |--------|----------|
//! | candidate | `GET /applications/candidate/`, `POST /applications/apply/:job/`, `DELETE /applications/delete/:id/` |
//! | employer | `GET /applications/employer/`, `PATCH /applications/employer/:id/`, `DELETE /applications/employer/:id/` |
//!
//! The server allows one application per job and candidate. [`has_applied`]
//! is a hint for hiding the apply button, not a guarantee.

use store::KeyValueStore;

use crate::client::{with_query, ApiClient, Auth};
use crate::error::ApiError;
use crate::jobs::SearchQuery;
use crate::models::{Application, ApplicationDraft, ApplicationStatus, StatusUpdate};
use crate::transport::{Body, Method, Transport};

pub async fn candidate_list<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
) -> Result<Vec<Application>, ApiError> {
    client.get("/applications/candidate/").await
}

/// Applications to the signed-in employer's jobs, optionally searched.
pub async fn employer_list<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    search: Option<&str>,
) -> Result<Vec<Application>, ApiError> {
    let path = with_query("/applications/employer/", &SearchQuery { search })?;
    client.get(&path).await
}

/// Multipart `POST /applications/apply/:job/` with `coverLetter`, `resume`
/// and `job`.
pub async fn apply<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    job: i64,
    draft: &ApplicationDraft,
) -> Result<(), ApiError> {
    client
        .execute(
            Method::Post,
            &format!("/applications/apply/{job}/"),
            Body::Multipart(draft.to_multipart(job)),
            Auth::Required,
        )
        .await
}

pub async fn set_status<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    id: i64,
    status: ApplicationStatus,
) -> Result<(), ApiError> {
    let body = Body::Json(serde_json::to_value(StatusUpdate { status })?);
    client
        .execute(
            Method::Patch,
            &format!("/applications/employer/{id}/"),
            body,
            Auth::Required,
        )
        .await
}

/// Candidate withdraws their own application.
pub async fn withdraw<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    id: i64,
) -> Result<(), ApiError> {
    client
        .execute(
            Method::Delete,
            &format!("/applications/delete/{id}/"),
            Body::Empty,
            Auth::Required,
        )
        .await
}

/// Employer deletes an application to one of their jobs.
pub async fn discard<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    id: i64,
) -> Result<(), ApiError> {
    client
        .execute(
            Method::Delete,
            &format!("/applications/employer/{id}/"),
            Body::Empty,
            Auth::Required,
        )
        .await
}

pub fn has_applied(applications: &[Application], job: i64) -> bool {
    applications.iter().any(|app| app.job == Some(job))
}

/// Fetch the candidate's applications and check for `job`. Any failure reads
/// as "not applied"; the server rejects a duplicate anyway.
pub async fn has_applied_to<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    job: i64,
) -> bool {
    match candidate_list(client).await {
        Ok(applications) => has_applied(&applications, job),
        Err(err) => {
            tracing::debug!(error = %err, "applied check failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormController, FormStatus, Upload};
    use crate::mock::MockTransport;
    use crate::sync::Collection;
    use serde_json::json;
    use store::{ClientConfig, MemoryStore};

    fn client(mock: &MockTransport) -> ApiClient<MockTransport, MemoryStore> {
        let client = ApiClient::new(mock.clone(), MemoryStore::new(), &ClientConfig::default());
        client.credentials().save("tok", "candidate");
        client
    }

    fn app(id: i64, job: i64) -> serde_json::Value {
        json!({
            "id": id,
            "job": job,
            "job_title": "Backend Engineer",
            "cover_letter": "",
            "applied_at": "2024-06-01T12:00:00Z",
            "status": "new"
        })
    }

    #[tokio::test]
    async fn test_status_update_reverts_on_server_error() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/applications/employer/", 200, json!([app(42, 1)]));
        mock.respond(Method::Patch, "/api/applications/employer/42/", 500, json!({}));
        let client = client(&mock);
        let applicants: Collection<Application> = Collection::new();
        applicants.load(employer_list(&client, None)).await;
        let probe = applicants.clone();

        let result = applicants
            .update(
                42,
                |a| a.with_status(ApplicationStatus::Accepted),
                async {
                    let seen = probe.snapshot().get(&42).map(|a| a.status);
                    assert_eq!(seen, Some(ApplicationStatus::Accepted));
                    set_status(&client, 42, ApplicationStatus::Accepted).await
                },
            )
            .await;

        assert!(result.is_err());
        let state = applicants.snapshot();
        assert_eq!(state.get(&42).map(|a| a.status), Some(ApplicationStatus::New));
        assert!(state.item_error(&42).is_some());

        match mock.last_request().unwrap().body {
            Body::Json(body) => assert_eq!(body, json!({"status": "accepted"})),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_withdraw_then_reload_omits_entry() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Get,
            "/api/applications/candidate/",
            200,
            json!([app(7, 1), app(8, 2)]),
        );
        mock.respond(Method::Get, "/api/applications/candidate/", 200, json!([app(8, 2)]));
        mock.respond_text(Method::Delete, "/api/applications/delete/7/", 204, "");
        let client = client(&mock);
        let mine: Collection<Application> = Collection::new();

        mine.load(candidate_list(&client)).await;
        mine.remove(7, withdraw(&client, 7)).await.unwrap();
        assert!(mine.snapshot().get(&7).is_none());

        mine.load(candidate_list(&client)).await;
        assert!(mine.snapshot().get(&7).is_none());
        assert_eq!(mine.items().len(), 1);
    }

    #[tokio::test]
    async fn test_employer_delete_uses_employer_path() {
        let mock = MockTransport::new();
        mock.respond_text(Method::Delete, "/api/applications/employer/3/", 204, "");
        let client = client(&mock);

        discard(&client, 3).await.unwrap();
        assert_eq!(mock.count(Method::Delete, "/api/applications/employer/3/"), 1);
        assert_eq!(mock.count(Method::Delete, "/api/applications/delete/3/"), 0);
    }

    #[tokio::test]
    async fn test_applicant_search_query() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/applications/employer/?search=ada", 200, json!([]));
        let client = client(&mock);

        employer_list(&client, Some("ada")).await.unwrap();
        assert_eq!(mock.count(Method::Get, "/api/applications/employer/"), 1);
    }

    #[tokio::test]
    async fn test_short_cover_letter_never_sends() {
        let mock = MockTransport::new();
        let client = client(&mock);
        let form: FormController<ApplicationDraft> = FormController::create();
        form.update(|draft| {
            draft.cover_letter = "x".repeat(20);
            draft.resume = Some(Upload::new("cv.pdf", vec![1]));
        });

        let out = form
            .submit(|draft| async move { apply(&client, 4, &draft).await }, |_| {})
            .await;

        assert!(out.is_none());
        assert_eq!(
            form.state().field_error("cover_letter"),
            Some("Cover letter must be at least 30 characters")
        );
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_apply_sends_multipart() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, "/api/applications/apply/4/", 201, json!({"id": 1}));
        let client = client(&mock);
        let form: FormController<ApplicationDraft> = FormController::create();
        form.update(|draft| {
            draft.cover_letter = "I have been writing Rust services for six years.".to_string();
            draft.resume = Some(Upload::new("cv.pdf", vec![1, 2]));
        });

        form.submit(|draft| async move { apply(&client, 4, &draft).await }, |_| {})
            .await
            .unwrap();

        assert_eq!(form.status(), FormStatus::Success);
        assert_eq!(form.draft(), ApplicationDraft::default());
        let request = mock.last_request().unwrap();
        assert_eq!(request.header("authorization"), Some("Bearer tok"));
        match request.body {
            Body::Multipart(parts) => {
                assert_eq!(parts.text_value("job"), Some("4"));
                assert_eq!(parts.upload("resume").map(|u| u.is_pdf()), Some(true));
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_applied_hint() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/applications/candidate/", 200, json!([app(1, 9)]));
        let client = client(&mock);

        assert!(has_applied_to(&client, 9).await);
        assert!(!has_applied_to(&client, 10).await);
    }
}
