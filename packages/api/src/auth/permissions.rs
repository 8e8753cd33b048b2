//! Which role may do what.
//!
//! | Action | anonymous | candidate | employer |
//! |--------|-----------|-----------|----------|
//! | browse jobs | ✓ | ✓ | ✓ |
//! | apply, withdraw, view own applications | | ✓ | |
//! | post/edit/delete jobs, view applicants, update status, delete applicants | | | ✓ |
//!
//! The server enforces ownership; this table only decides which controls a
//! view renders.

use crate::models::Role;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    BrowseJobs,
    Apply,
    Withdraw,
    ViewOwnApplications,
    PostJob,
    EditJob,
    DeleteJob,
    ViewApplicants,
    UpdateApplicationStatus,
    DeleteApplicant,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::BrowseJobs,
        Action::Apply,
        Action::Withdraw,
        Action::ViewOwnApplications,
        Action::PostJob,
        Action::EditJob,
        Action::DeleteJob,
        Action::ViewApplicants,
        Action::UpdateApplicationStatus,
        Action::DeleteApplicant,
    ];
}

impl Role {
    pub fn permits(&self, action: Action) -> bool {
        match action {
            Action::BrowseJobs => true,
            Action::Apply | Action::Withdraw | Action::ViewOwnApplications => {
                *self == Role::Candidate
            }
            Action::PostJob
            | Action::EditJob
            | Action::DeleteJob
            | Action::ViewApplicants
            | Action::UpdateApplicationStatus
            | Action::DeleteApplicant => *self == Role::Employer,
        }
    }
}

/// Permission check for a possibly anonymous visitor.
pub fn permitted(role: Option<Role>, action: Action) -> bool {
    match role {
        Some(role) => role.permits(action),
        None => action == Action::BrowseJobs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Action::BrowseJobs, true, true, true)]
    #[case(Action::Apply, false, true, false)]
    #[case(Action::Withdraw, false, true, false)]
    #[case(Action::ViewOwnApplications, false, true, false)]
    #[case(Action::PostJob, false, false, true)]
    #[case(Action::EditJob, false, false, true)]
    #[case(Action::DeleteJob, false, false, true)]
    #[case(Action::ViewApplicants, false, false, true)]
    #[case(Action::UpdateApplicationStatus, false, false, true)]
    #[case(Action::DeleteApplicant, false, false, true)]
    fn test_permission_table(
        #[case] action: Action,
        #[case] anonymous: bool,
        #[case] candidate: bool,
        #[case] employer: bool,
    ) {
        assert_eq!(permitted(None, action), anonymous);
        assert_eq!(permitted(Some(Role::Candidate), action), candidate);
        assert_eq!(permitted(Some(Role::Employer), action), employer);
    }

    #[test]
    fn test_roles_never_share_mutations() {
        for action in Action::ALL {
            if action == Action::BrowseJobs {
                continue;
            }
            assert_ne!(
                Role::Candidate.permits(action),
                Role::Employer.permits(action),
                "{action:?}"
            );
        }
    }
}
