//! Employer dashboard: own jobs, incoming applications and the company
//! profile, fetched concurrently.

use futures::join;
use store::KeyValueStore;

use crate::applications;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::jobs;
use crate::models::{Application, EmployerProfile, JobPosting};
use crate::profiles;
use crate::transport::Transport;

pub const RECENT_APPLICANTS: usize = 5;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmployerDashboard {
    pub jobs: Vec<JobPosting>,
    pub applicants: Vec<Application>,
    /// `None` until the employer has created a profile.
    pub profile: Option<EmployerProfile>,
}

impl EmployerDashboard {
    pub fn total_posts(&self) -> usize {
        self.jobs.len()
    }

    pub fn total_applications(&self) -> usize {
        self.applicants.len()
    }

    /// Newest applications first.
    pub fn recent_applicants(&self, limit: usize) -> Vec<&Application> {
        let mut recent: Vec<&Application> = self.applicants.iter().collect();
        recent.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        recent.truncate(limit);
        recent
    }
}

/// Jobs and applicants must both load; a missing profile is tolerated.
pub async fn employer_dashboard<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
) -> Result<EmployerDashboard, ApiError> {
    let (jobs, applicants, profile) = join!(
        jobs::mine(client),
        applications::employer_list(client, None),
        profiles::employer(client)
    );

    let profile = match profile {
        Ok(profile) => Some(profile),
        Err(err) => {
            tracing::debug!(error = %err, "dashboard without employer profile");
            None
        }
    };

    Ok(EmployerDashboard {
        jobs: jobs?,
        applicants: applicants?,
        profile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::transport::Method;
    use serde_json::json;
    use store::{ClientConfig, MemoryStore};

    fn applicant(id: i64, day: u32) -> serde_json::Value {
        json!({
            "id": id,
            "applied_at": format!("2024-06-{day:02}T10:00:00Z"),
            "candidate_name": format!("Candidate {id}"),
            "status": "new"
        })
    }

    fn client(mock: &MockTransport) -> ApiClient<MockTransport, MemoryStore> {
        let client = ApiClient::new(mock.clone(), MemoryStore::new(), &ClientConfig::default());
        client.credentials().save("tok", "employer");
        client
    }

    #[tokio::test]
    async fn test_dashboard_totals_and_recent() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Get,
            "/api/jobs/my-jobs/",
            200,
            json!([{"id": 1, "title": "Ops", "created_at": "2024-05-01T00:00:00Z"}]),
        );
        mock.respond(
            Method::Get,
            "/api/applications/employer/",
            200,
            serde_json::Value::Array((1..=7).map(|i| applicant(i, i as u32)).collect()),
        );
        mock.respond(
            Method::Get,
            "/api/auth/employer/profile/",
            200,
            json!({"company_name": "Acme"}),
        );
        let client = client(&mock);

        let dashboard = employer_dashboard(&client).await.unwrap();
        assert_eq!(dashboard.total_posts(), 1);
        assert_eq!(dashboard.total_applications(), 7);
        let recent: Vec<i64> = dashboard
            .recent_applicants(RECENT_APPLICANTS)
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(recent, [7, 6, 5, 4, 3]);
        assert_eq!(
            dashboard.profile.map(|p| p.company_name).as_deref(),
            Some("Acme")
        );
        assert_eq!(mock.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_dashboard_without_profile() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/jobs/my-jobs/", 200, json!([]));
        mock.respond(Method::Get, "/api/applications/employer/", 200, json!([]));
        let client = client(&mock);

        let dashboard = employer_dashboard(&client).await.unwrap();
        assert!(dashboard.profile.is_none());
        assert!(dashboard.recent_applicants(RECENT_APPLICANTS).is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_fails_when_jobs_fail() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/jobs/my-jobs/", 500, json!({}));
        mock.respond(Method::Get, "/api/applications/employer/", 200, json!([]));
        let client = client(&mock);

        assert!(employer_dashboard(&client).await.is_err());
    }
}
