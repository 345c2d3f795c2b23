//! Handlers for `/projects/{id}/members`.
//!
//! Listing needs `viewer`; every change needs `manager`. A project always
//! keeps at least one manager.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dailies_core::access::{last_manager_conflict, thresholds};
use dailies_core::audit::actions;
use dailies_core::error::CoreError;
use dailies_core::types::DbId;
use dailies_db::models::project_member::{
    AddProjectMember, MembershipChange, ProjectMember, ProjectMemberDetail, UpdateProjectMember,
};
use dailies_db::repositories::ProjectMemberRepo;

use super::project::load_project;
use super::support::{check_user, not_found, record_audit};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, PathId, PathIds};
use crate::middleware::auth::AuthUser;
use crate::middleware::project_access::verify_project_access;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

/// GET /api/v1/projects/{id}/members
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
) -> AppResult<Json<ApiResponse<Vec<ProjectMemberDetail>>>> {
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::READ).await?;
    Ok(ok(ProjectMemberRepo::list(&state.pool, project_id).await?))
}

/// POST /api/v1/projects/{id}/members
pub async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    AppJson(input): AppJson<AddProjectMember>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProjectMember>>)> {
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::MANAGE).await?;
    check_user(&state, Some(input.user_id)).await?;

    if ProjectMemberRepo::find(&state.pool, project_id, input.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "User {} is already a member of this project",
            input.user_id
        ))));
    }

    let member =
        ProjectMemberRepo::upsert(&state.pool, project_id, input.user_id, input.role).await?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::MEMBER_ADD,
        "project",
        Some(project_id),
        serde_json::json!({ "user_id": input.user_id, "role": input.role }),
    )
    .await;

    Ok((StatusCode::CREATED, ok(member)))
}

/// PATCH /api/v1/projects/{id}/members/{user_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    PathIds(project_id, member_id): PathIds,
    AppJson(input): AppJson<UpdateProjectMember>,
) -> AppResult<Json<ApiResponse<ProjectMember>>> {
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::MANAGE).await?;

    let change =
        ProjectMemberRepo::change_role(&state.pool, project_id, member_id, Some(input.role))
            .await?;
    let MembershipChange::Updated { previous, member } = change else {
        return Err(rejected(change, member_id));
    };
    record_audit(
        &state,
        Some(user.user_id),
        actions::MEMBER_UPDATE,
        "project",
        Some(project_id),
        serde_json::json!({ "user_id": member_id, "from": previous, "to": input.role }),
    )
    .await;

    Ok(ok(member))
}

/// DELETE /api/v1/projects/{id}/members/{user_id}
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    PathIds(project_id, member_id): PathIds,
) -> AppResult<StatusCode> {
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::MANAGE).await?;

    let change = ProjectMemberRepo::change_role(&state.pool, project_id, member_id, None).await?;
    let MembershipChange::Removed { previous } = change else {
        return Err(rejected(change, member_id));
    };
    record_audit(
        &state,
        Some(user.user_id),
        actions::MEMBER_REMOVE,
        "project",
        Some(project_id),
        serde_json::json!({ "user_id": member_id, "role": previous }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

fn rejected(change: MembershipChange, member_id: DbId) -> AppError {
    match change {
        MembershipChange::LastManager => AppError::Core(last_manager_conflict()),
        _ => not_found("ProjectMember", member_id),
    }
}
