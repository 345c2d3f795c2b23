//! Handlers for episodes (`/projects/{id}/episodes`, `/episodes/{id}`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dailies_core::access::thresholds;
use dailies_core::audit::actions;
use dailies_core::codes::EntityType;
use dailies_core::types::DbId;
use dailies_db::models::episode::{CreateEpisode, Episode, EpisodeFilter, UpdateEpisode};
use dailies_db::repositories::EpisodeRepo;

use super::project::load_project;
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

pub(crate) async fn load_episode(state: &AppState, id: DbId) -> AppResult<Episode> {
    EpisodeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Episode", id))
}

/// POST /api/v1/projects/{id}/episodes
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    ValidatedJson(input): ValidatedJson<CreateEpisode>,
) -> AppResult<(StatusCode, Json<ApiResponse<Episode>>)> {
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::WRITE).await?;
    check_status(&state, input.status_id, EntityType::Episode).await?;
    ensure_code_free(
        EpisodeRepo::code_exists(&state.pool, &input.code).await?,
        "Episode",
        &input.code,
    )?;

    let episode = EpisodeRepo::create(&state.pool, project_id, &input, user.user_id).await?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::CREATE,
        EntityType::Episode.as_str(),
        Some(episode.id),
        serde_json::json!({ "project_id": project_id, "code": episode.code }),
    )
    .await;

    Ok((StatusCode::CREATED, ok(episode)))
}

/// GET /api/v1/projects/{id}/episodes
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    AppQuery(params): AppQuery<ListParams>,
    AppQuery(filter): AppQuery<EpisodeFilter>,
) -> AppResult<Json<ApiResponse<Vec<Episode>>>> {
    let page = params.page()?;
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::READ).await?;

    let (mut episodes, total) =
        EpisodeRepo::list_by_project(&state.pool, project_id, &filter, &page).await?;
    sign_thumbnails(&state, &mut episodes).await;
    Ok(paged(episodes, total, &page))
}

/// GET /api/v1/episodes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Episode>>> {
    let mut episode = load_episode(&state, id).await?;
    verify_project_access(&state, &user, episode.project_id, thresholds::READ).await?;
    sign_thumbnail(&state, &mut episode).await;
    Ok(ok(episode))
}

/// PATCH /api/v1/episodes/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<UpdateEpisode>,
) -> AppResult<Json<ApiResponse<Episode>>> {
    let current = load_episode(&state, id).await?;
    verify_project_access(&state, &user, current.project_id, thresholds::WRITE).await?;
    check_status(&state, input.status_id.flatten(), EntityType::Episode).await?;

    let mut episode = EpisodeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Episode", id))?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::UPDATE,
        EntityType::Episode.as_str(),
        Some(id),
        serde_json::json!({
            "name": input.name,
            "description": input.description,
            "status_id": input.status_id,
        }),
    )
    .await;

    sign_thumbnail(&state, &mut episode).await;
    Ok(ok(episode))
}

/// DELETE /api/v1/episodes/{id}
///
/// Cascades to the episode's sequences and their shots.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    let episode = load_episode(&state, id).await?;
    verify_project_access(&state, &user, episode.project_id, thresholds::DELETE).await?;

    if !EpisodeRepo::delete(&state.pool, id).await? {
        return Err(not_found("Episode", id));
    }
    discard_thumbnail(&state, episode.thumbnail_path.as_deref()).await;
    record_audit(
        &state,
        Some(user.user_id),
        actions::DELETE,
        EntityType::Episode.as_str(),
        Some(id),
        serde_json::json!({ "project_id": episode.project_id, "code": episode.code }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
