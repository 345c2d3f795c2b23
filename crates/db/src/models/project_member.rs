//! Project membership model and DTOs.

use dailies_core::access::ProjectRole;
use dailies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `project_members`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    pub project_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Membership joined with the member's user details, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMemberDetail {
    pub project_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub email: String,
    pub display_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Outcome of [`ProjectMemberRepo::change_role`](crate::repositories::ProjectMemberRepo::change_role).
#[derive(Debug, Clone)]
pub enum MembershipChange {
    Updated {
        previous: ProjectRole,
        member: ProjectMember,
    },
    Removed {
        previous: ProjectRole,
    },
    NotMember,
    /// The change would remove the project's only manager. Nothing was written.
    LastManager,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddProjectMember {
    pub user_id: DbId,
    pub role: ProjectRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProjectMember {
    pub role: ProjectRole,
}
