//! Handlers for sequences (`/episodes/{id}/sequences`, `/sequences/{id}`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dailies_core::access::thresholds;
use dailies_core::audit::actions;
use dailies_core::codes::EntityType;
use dailies_core::types::DbId;
use dailies_db::models::sequence::{CreateSequence, Sequence, SequenceFilter, UpdateSequence};
use dailies_db::repositories::SequenceRepo;

use super::episode::load_episode;
use super::support::{
    check_status, discard_thumbnail, ensure_code_free, not_found, record_audit, sign_thumbnail,
    sign_thumbnails,
};
use crate::error::AppResult;
use crate::extract::{AppQuery, PathId, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::project_access::verify_project_access;
use crate::query::ListParams;
use crate::response::{ok, paged, ApiResponse};
use crate::state::AppState;

pub(crate) async fn load_sequence(state: &AppState, id: DbId) -> AppResult<Sequence> {
    SequenceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Sequence", id))
}

/// POST /api/v1/episodes/{id}/sequences
///
/// The sequence inherits the episode's project.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(episode_id): PathId,
    ValidatedJson(input): ValidatedJson<CreateSequence>,
) -> AppResult<(StatusCode, Json<ApiResponse<Sequence>>)> {
    let episode = load_episode(&state, episode_id).await?;
    verify_project_access(&state, &user, episode.project_id, thresholds::WRITE).await?;
    check_status(&state, input.status_id, EntityType::Sequence).await?;
    ensure_code_free(
        SequenceRepo::code_exists(&state.pool, &input.code).await?,
        "Sequence",
        &input.code,
    )?;

    let sequence =
        SequenceRepo::create(&state.pool, episode.project_id, episode_id, &input, user.user_id)
            .await?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::CREATE,
        EntityType::Sequence.as_str(),
        Some(sequence.id),
        serde_json::json!({ "episode_id": episode_id, "code": sequence.code }),
    )
    .await;

    Ok((StatusCode::CREATED, ok(sequence)))
}

/// GET /api/v1/episodes/{id}/sequences
pub async fn list_by_episode(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(episode_id): PathId,
    AppQuery(params): AppQuery<ListParams>,
    AppQuery(filter): AppQuery<SequenceFilter>,
) -> AppResult<Json<ApiResponse<Vec<Sequence>>>> {
    let page = params.page()?;
    let episode = load_episode(&state, episode_id).await?;
    verify_project_access(&state, &user, episode.project_id, thresholds::READ).await?;

    let (mut sequences, total) =
        SequenceRepo::list_by_episode(&state.pool, episode_id, &filter, &page).await?;
    sign_thumbnails(&state, &mut sequences).await;
    Ok(paged(sequences, total, &page))
}

/// GET /api/v1/sequences/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Sequence>>> {
    let mut sequence = load_sequence(&state, id).await?;
    verify_project_access(&state, &user, sequence.project_id, thresholds::READ).await?;
    sign_thumbnail(&state, &mut sequence).await;
    Ok(ok(sequence))
}

/// PATCH /api/v1/sequences/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<UpdateSequence>,
) -> AppResult<Json<ApiResponse<Sequence>>> {
    let current = load_sequence(&state, id).await?;
    verify_project_access(&state, &user, current.project_id, thresholds::WRITE).await?;
    check_status(&state, input.status_id.flatten(), EntityType::Sequence).await?;

    let mut sequence = SequenceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Sequence", id))?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::UPDATE,
        EntityType::Sequence.as_str(),
        Some(id),
        serde_json::json!({
            "name": input.name,
            "description": input.description,
            "status_id": input.status_id,
        }),
    )
    .await;

    sign_thumbnail(&state, &mut sequence).await;
    Ok(ok(sequence))
}

/// DELETE /api/v1/sequences/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    let sequence = load_sequence(&state, id).await?;
    verify_project_access(&state, &user, sequence.project_id, thresholds::DELETE).await?;

    if !SequenceRepo::delete(&state.pool, id).await? {
        return Err(not_found("Sequence", id));
    }
    discard_thumbnail(&state, sequence.thumbnail_path.as_deref()).await;
    record_audit(
        &state,
        Some(user.user_id),
        actions::DELETE,
        EntityType::Sequence.as_str(),
        Some(id),
        serde_json::json!({ "episode_id": sequence.episode_id, "code": sequence.code }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
