//! Project-scoped authorization.

use dailies_core::access::{check_project_access, ProjectRole};
use dailies_core::types::DbId;
use dailies_db::repositories::ProjectMemberRepo;

use super::auth::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;

/// Check that `user` holds at least `required` on `project_id`.
///
/// Admins always pass. Callers look up the project (or the entity that
/// leads to it) first, so a missing project is reported as 404 before any
/// 403. Returns the caller's membership role, `None` for admins who are
/// not members.
pub async fn verify_project_access(
    state: &AppState,
    user: &AuthUser,
    project_id: DbId,
    required: ProjectRole,
) -> AppResult<Option<ProjectRole>> {
    let membership = ProjectMemberRepo::role_of(&state.pool, project_id, user.user_id).await?;
    if let Err(err) = check_project_access(&user.role, membership, required) {
        tracing::debug!(
            user_id = user.user_id,
            project_id,
            required = %required,
            "Project access denied",
        );
        return Err(err.into());
    }
    Ok(membership)
}
