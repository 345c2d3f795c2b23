//! Project-scoped access control.
//!
//! Every project-scoped operation names a minimum [`ProjectRole`]. Global
//! admins pass every check; everyone else needs a membership row on the
//! project whose role is at or above the threshold.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::ROLE_ADMIN;

/// Per-project membership role. Variants are ordered from least to most
/// privileged, so `>=` expresses "at least".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Viewer,
    Artist,
    Supervisor,
    Manager,
}

impl ProjectRole {
    pub const ALL: [ProjectRole; 4] = [
        ProjectRole::Viewer,
        ProjectRole::Artist,
        ProjectRole::Supervisor,
        ProjectRole::Manager,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectRole::Viewer => "viewer",
            ProjectRole::Artist => "artist",
            ProjectRole::Supervisor => "supervisor",
            ProjectRole::Manager => "manager",
        }
    }

    /// Parse a lowercase role name.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == value)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid project role '{value}'. Must be one of: viewer, artist, supervisor, manager"
                ))
            })
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum roles for the common operation kinds.
pub mod thresholds {
    use super::ProjectRole;

    pub const READ: ProjectRole = ProjectRole::Viewer;
    pub const WRITE: ProjectRole = ProjectRole::Artist;
    pub const DELETE: ProjectRole = ProjectRole::Supervisor;
    pub const MANAGE: ProjectRole = ProjectRole::Manager;
}

/// Decide whether a caller may act on a project.
///
/// `membership` is the caller's role on the project, `None` when they are
/// not a member.
pub fn check_project_access(
    global_role: &str,
    membership: Option<ProjectRole>,
    required: ProjectRole,
) -> Result<(), CoreError> {
    if global_role == ROLE_ADMIN {
        return Ok(());
    }
    match membership {
        None => Err(CoreError::Forbidden(
            "You are not a member of this project".into(),
        )),
        Some(role) if role < required => Err(CoreError::Forbidden(format!(
            "Project role '{required}' or higher required"
        ))),
        Some(_) => Ok(()),
    }
}

/// Reject a membership change that would leave a project without a manager.
///
/// `current` is the member's role before the change, `next` the role after
/// (`None` when the member is being removed).
pub fn check_manager_retained(
    current: ProjectRole,
    next: Option<ProjectRole>,
    manager_count: i64,
) -> Result<(), CoreError> {
    let loses_manager = current == ProjectRole::Manager && next != Some(ProjectRole::Manager);
    if loses_manager && manager_count <= 1 {
        return Err(last_manager_conflict());
    }
    Ok(())
}

pub fn last_manager_conflict() -> CoreError {
    CoreError::Conflict("A project must keep at least one manager".into())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::{ROLE_ARTIST, ROLE_PRODUCER};

    #[test]
    fn roles_are_ordered() {
        assert!(ProjectRole::Viewer < ProjectRole::Artist);
        assert!(ProjectRole::Artist < ProjectRole::Supervisor);
        assert!(ProjectRole::Supervisor < ProjectRole::Manager);
    }

    #[test]
    fn parse_round_trips_known_names() {
        for role in ProjectRole::ALL {
            assert_eq!(ProjectRole::parse(role.as_str()).unwrap(), role);
        }
        assert_matches!(ProjectRole::parse("owner"), Err(CoreError::Validation(_)));
        assert_matches!(ProjectRole::parse("Manager"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn admin_bypasses_membership() {
        assert!(check_project_access(ROLE_ADMIN, None, thresholds::MANAGE).is_ok());
    }

    #[test]
    fn non_member_is_forbidden() {
        assert_matches!(
            check_project_access(ROLE_PRODUCER, None, thresholds::READ),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn membership_below_threshold_is_forbidden() {
        let err = check_project_access(ROLE_ARTIST, Some(ProjectRole::Artist), thresholds::DELETE)
            .unwrap_err();
        assert_matches!(err, CoreError::Forbidden(msg) if msg.contains("supervisor"));
    }

    #[test]
    fn membership_at_or_above_threshold_passes() {
        assert!(check_project_access(ROLE_ARTIST, Some(ProjectRole::Artist), thresholds::WRITE).is_ok());
        assert!(
            check_project_access(ROLE_ARTIST, Some(ProjectRole::Manager), thresholds::DELETE).is_ok()
        );
    }

    #[test]
    fn last_manager_cannot_be_demoted_or_removed() {
        assert_matches!(
            check_manager_retained(ProjectRole::Manager, Some(ProjectRole::Artist), 1),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            check_manager_retained(ProjectRole::Manager, None, 1),
            Err(CoreError::Conflict(_))
        );
        assert!(check_manager_retained(ProjectRole::Manager, None, 2).is_ok());
        assert!(check_manager_retained(ProjectRole::Artist, None, 1).is_ok());
        assert!(
            check_manager_retained(ProjectRole::Manager, Some(ProjectRole::Manager), 1).is_ok()
        );
    }
}
