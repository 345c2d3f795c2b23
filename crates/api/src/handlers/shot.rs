//! Handlers for shots (`/sequences/{id}/shots`, `/projects/{id}/shots`,
//! `/shots/{id}`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dailies_core::access::thresholds;
use dailies_core::audit::actions;
use dailies_core::codes::EntityType;
use dailies_core::shot::validate_cut_range;
use dailies_core::types::DbId;
use dailies_db::models::shot::{CreateShot, Shot, ShotFilter, UpdateShot};
use dailies_db::repositories::ShotRepo;

use super::project::load_project;
use super::sequence::load_sequence;
use super::support::{
    check_status, check_user, discard_thumbnail, ensure_code_free, not_found, record_audit,
    sign_thumbnail, sign_thumbnails,
};
use crate::error::AppResult;
use crate::extract::{AppQuery, PathId, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::project_access::verify_project_access;
use crate::query::ListParams;
use crate::response::{ok, paged, ApiResponse};
use crate::state::AppState;

async fn load_shot(state: &AppState, id: DbId) -> AppResult<Shot> {
    ShotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Shot", id))
}

/// POST /api/v1/sequences/{id}/shots
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(sequence_id): PathId,
    ValidatedJson(input): ValidatedJson<CreateShot>,
) -> AppResult<(StatusCode, Json<ApiResponse<Shot>>)> {
    let sequence = load_sequence(&state, sequence_id).await?;
    verify_project_access(&state, &user, sequence.project_id, thresholds::WRITE).await?;

    validate_cut_range(input.cut_in, input.cut_out)?;
    check_status(&state, input.status_id, EntityType::Shot).await?;
    check_user(&state, input.assigned_to).await?;
    ensure_code_free(
        ShotRepo::code_exists(&state.pool, &input.code).await?,
        "Shot",
        &input.code,
    )?;

    let shot = ShotRepo::create(
        &state.pool,
        sequence.project_id,
        sequence_id,
        &input,
        user.user_id,
    )
    .await?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::CREATE,
        EntityType::Shot.as_str(),
        Some(shot.id),
        serde_json::json!({ "sequence_id": sequence_id, "code": shot.code }),
    )
    .await;
    tracing::debug!(shot_id = shot.id, code = %shot.code, "Shot created");

    Ok((StatusCode::CREATED, ok(shot)))
}

/// GET /api/v1/sequences/{id}/shots
pub async fn list_by_sequence(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(sequence_id): PathId,
    AppQuery(params): AppQuery<ListParams>,
    AppQuery(filter): AppQuery<ShotFilter>,
) -> AppResult<Json<ApiResponse<Vec<Shot>>>> {
    let page = params.page()?;
    let sequence = load_sequence(&state, sequence_id).await?;
    verify_project_access(&state, &user, sequence.project_id, thresholds::READ).await?;

    let (mut shots, total) =
        ShotRepo::list_by_sequence(&state.pool, sequence_id, &filter, &page).await?;
    sign_thumbnails(&state, &mut shots).await;
    Ok(paged(shots, total, &page))
}

/// GET /api/v1/projects/{id}/shots
///
/// Every shot of the project, optionally narrowed with `?sequence_id=`.
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    AppQuery(params): AppQuery<ListParams>,
    AppQuery(filter): AppQuery<ShotFilter>,
) -> AppResult<Json<ApiResponse<Vec<Shot>>>> {
    let page = params.page()?;
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::READ).await?;

    let (mut shots, total) =
        ShotRepo::list_by_project(&state.pool, project_id, &filter, &page).await?;
    sign_thumbnails(&state, &mut shots).await;
    Ok(paged(shots, total, &page))
}

/// GET /api/v1/shots/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Shot>>> {
    let mut shot = load_shot(&state, id).await?;
    verify_project_access(&state, &user, shot.project_id, thresholds::READ).await?;
    sign_thumbnail(&state, &mut shot).await;
    Ok(ok(shot))
}

/// PATCH /api/v1/shots/{id}
///
/// The cut range is checked against the merged result, so sending only
/// `cut_out` is validated against the stored `cut_in`.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<UpdateShot>,
) -> AppResult<Json<ApiResponse<Shot>>> {
    let current = load_shot(&state, id).await?;
    verify_project_access(&state, &user, current.project_id, thresholds::WRITE).await?;

    validate_cut_range(
        input.cut_in.unwrap_or(current.cut_in),
        input.cut_out.unwrap_or(current.cut_out),
    )?;
    check_status(&state, input.status_id.flatten(), EntityType::Shot).await?;
    check_user(&state, input.assigned_to.flatten()).await?;

    let mut shot = ShotRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Shot", id))?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::UPDATE,
        EntityType::Shot.as_str(),
        Some(id),
        serde_json::json!({
            "name": input.name,
            "description": input.description,
            "status_id": input.status_id,
            "cut_in": input.cut_in,
            "cut_out": input.cut_out,
            "assigned_to": input.assigned_to,
        }),
    )
    .await;

    sign_thumbnail(&state, &mut shot).await;
    Ok(ok(shot))
}

/// DELETE /api/v1/shots/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    let shot = load_shot(&state, id).await?;
    verify_project_access(&state, &user, shot.project_id, thresholds::DELETE).await?;

    if !ShotRepo::delete(&state.pool, id).await? {
        return Err(not_found("Shot", id));
    }
    discard_thumbnail(&state, shot.thumbnail_path.as_deref()).await;
    record_audit(
        &state,
        Some(user.user_id),
        actions::DELETE,
        EntityType::Shot.as_str(),
        Some(id),
        serde_json::json!({ "sequence_id": shot.sequence_id, "code": shot.code }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
