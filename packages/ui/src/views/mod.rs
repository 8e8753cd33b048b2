mod common;

mod jobs;
pub use jobs::{JobCard, JobsView};

mod job_detail;
pub use job_detail::JobDetailView;

mod post_job;
pub use post_job::PostJobView;

mod applications;
pub use applications::ApplicationsView;

mod applicants;
pub use applicants::ApplicantsView;

mod dashboard;
pub use dashboard::DashboardView;

mod login;
pub use login::LoginView;

mod register;
pub use register::RegisterView;

mod employer_profile;
pub use employer_profile::EmployerProfileView;

mod candidate_profile;
pub use candidate_profile::CandidateProfileView;
