//! Handlers for the `/projects` resource.
//!
//! Admins and producers create projects and become their first manager.
//! Everyone else sees only the projects they are a member of.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dailies_core::access::thresholds;
use dailies_core::audit::actions;
use dailies_core::codes::EntityType;
use dailies_core::error::CoreError;
use dailies_core::types::{Date, DbId};
use dailies_db::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use dailies_db::repositories::ProjectRepo;

use super::support::{
    check_status, discard_thumbnail, ensure_code_free, not_found, record_audit, sign_thumbnail,
    sign_thumbnails,
};
use crate::error::AppResult;
use crate::extract::{AppQuery, PathId, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::project_access::verify_project_access;
use crate::middleware::rbac::RequireProjectCreator;
use crate::query::ListParams;
use crate::response::{ok, paged, ApiResponse};
use crate::state::AppState;

/// Load a project or fail with 404.
pub(crate) async fn load_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Project", id))
}

fn check_schedule(start: Option<Date>, end: Option<Date>) -> Result<(), CoreError> {
    match (start, end) {
        (Some(s), Some(e)) if s > e => Err(CoreError::Validation(format!(
            "start_date ({s}) must not be after end_date ({e})"
        ))),
        _ => Ok(()),
    }
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    RequireProjectCreator(user): RequireProjectCreator,
    ValidatedJson(input): ValidatedJson<CreateProject>,
) -> AppResult<(StatusCode, Json<ApiResponse<Project>>)> {
    check_schedule(input.start_date, input.end_date)?;
    check_status(&state, input.status_id, EntityType::Project).await?;
    ensure_code_free(
        ProjectRepo::code_exists(&state.pool, &input.code).await?,
        "Project",
        &input.code,
    )?;

    let project = ProjectRepo::create(&state.pool, &input, user.user_id).await?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::CREATE,
        EntityType::Project.as_str(),
        Some(project.id),
        serde_json::json!({ "code": project.code, "name": project.name }),
    )
    .await;
    tracing::info!(project_id = project.id, code = %project.code, user_id = user.user_id, "Project created");

    Ok((StatusCode::CREATED, ok(project)))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(params): AppQuery<ListParams>,
    AppQuery(filter): AppQuery<ProjectFilter>,
) -> AppResult<Json<ApiResponse<Vec<Project>>>> {
    let page = params.page()?;
    let member_id = (!user.is_admin()).then_some(user.user_id);
    let (mut projects, total) = ProjectRepo::list(&state.pool, &filter, member_id, &page).await?;
    sign_thumbnails(&state, &mut projects).await;
    Ok(paged(projects, total, &page))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Project>>> {
    let mut project = load_project(&state, id).await?;
    verify_project_access(&state, &user, id, thresholds::READ).await?;
    sign_thumbnail(&state, &mut project).await;
    Ok(ok(project))
}

/// PATCH /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<UpdateProject>,
) -> AppResult<Json<ApiResponse<Project>>> {
    let current = load_project(&state, id).await?;
    verify_project_access(&state, &user, id, thresholds::MANAGE).await?;

    check_schedule(
        input.start_date.unwrap_or(current.start_date),
        input.end_date.unwrap_or(current.end_date),
    )?;
    check_status(&state, input.status_id.flatten(), EntityType::Project).await?;

    let mut project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Project", id))?;

    record_audit(
        &state,
        Some(user.user_id),
        actions::UPDATE,
        EntityType::Project.as_str(),
        Some(id),
        serde_json::json!({
            "name": input.name,
            "description": input.description,
            "status_id": input.status_id,
            "start_date": input.start_date,
            "end_date": input.end_date,
        }),
    )
    .await;

    sign_thumbnail(&state, &mut project).await;
    Ok(ok(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Cascades to every episode, sequence, shot, asset, version, playlist,
/// note and membership of the project.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    let project = load_project(&state, id).await?;
    verify_project_access(&state, &user, id, thresholds::MANAGE).await?;

    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(not_found("Project", id));
    }
    discard_thumbnail(&state, project.thumbnail_path.as_deref()).await;

    record_audit(
        &state,
        Some(user.user_id),
        actions::DELETE,
        EntityType::Project.as_str(),
        Some(id),
        serde_json::json!({ "code": project.code }),
    )
    .await;
    tracing::info!(project_id = id, user_id = user.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_bounds() {
        let d = |s: &str| Some(s.parse::<Date>().unwrap());
        assert!(check_schedule(d("2026-01-01"), d("2026-06-30")).is_ok());
        assert!(check_schedule(d("2026-01-01"), None).is_ok());
        assert!(check_schedule(d("2026-07-01"), d("2026-06-30")).is_err());
    }
}
