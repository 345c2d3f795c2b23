//! Handlers for playlists (`/projects/{id}/playlists`, `/playlists/{id}`,
//! `/playlists/{id}/versions`).
//!
//! A playlist is an ordered, duplicate-free list of version codes. Codes are
//! checked when they are added; a version deleted later simply drops out of
//! `GET /playlists/{id}/versions`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dailies_core::access::thresholds;
use dailies_core::audit::actions;
use dailies_core::codes::EntityType;
use dailies_core::error::CoreError;
use dailies_core::playlist::{check_size, dedupe, merge_codes, missing_codes, remove_codes};
use dailies_core::types::DbId;
use dailies_db::models::playlist::{
    CreatePlaylist, Playlist, PlaylistFilter, PlaylistVersionCodes, UpdatePlaylist,
};
use dailies_db::models::version::Version;
use dailies_db::repositories::{PlaylistRepo, VersionRepo};

use super::project::load_project;
use super::support::{ensure_code_free, not_found, record_audit, sign_thumbnails};
use crate::error::{AppError, AppResult};
use crate::extract::{AppQuery, PathId, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::project_access::verify_project_access;
use crate::query::ListParams;
use crate::response::{ok, paged, ApiResponse};
use crate::state::AppState;

async fn load_playlist(state: &AppState, id: DbId) -> AppResult<Playlist> {
    PlaylistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Playlist", id))
}

/// Deduplicate `codes`, enforce the size limit and check that every code is
/// an existing version of `project_id`.
async fn resolve_codes(
    state: &AppState,
    project_id: DbId,
    codes: &[String],
) -> AppResult<Vec<String>> {
    let codes = dedupe(codes);
    check_size(&codes)?;
    if codes.is_empty() {
        return Ok(codes);
    }

    let found = VersionRepo::find_by_codes(&state.pool, &codes).await?;
    let found_codes: Vec<String> = found.iter().map(|v| v.code.clone()).collect();
    if let Some(code) = missing_codes(&codes, &found_codes).into_iter().next() {
        return Err(AppError::Core(CoreError::NotFoundByCode {
            entity: "Version",
            code,
        }));
    }
    if let Some(foreign) = found.iter().find(|v| v.project_id != project_id) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Version '{}' belongs to another project",
            foreign.code
        ))));
    }
    Ok(codes)
}

/// POST /api/v1/projects/{id}/playlists
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    ValidatedJson(input): ValidatedJson<CreatePlaylist>,
) -> AppResult<(StatusCode, Json<ApiResponse<Playlist>>)> {
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::WRITE).await?;
    ensure_code_free(
        PlaylistRepo::code_exists(&state.pool, &input.code).await?,
        "Playlist",
        &input.code,
    )?;
    let codes = resolve_codes(&state, project_id, &input.version_codes).await?;

    let playlist =
        PlaylistRepo::create(&state.pool, project_id, &input, &codes, user.user_id).await?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::CREATE,
        EntityType::Playlist.as_str(),
        Some(playlist.id),
        serde_json::json!({
            "project_id": project_id,
            "code": playlist.code,
            "version_count": codes.len(),
        }),
    )
    .await;

    Ok((StatusCode::CREATED, ok(playlist)))
}

/// GET /api/v1/projects/{id}/playlists
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    AppQuery(params): AppQuery<ListParams>,
    AppQuery(filter): AppQuery<PlaylistFilter>,
) -> AppResult<Json<ApiResponse<Vec<Playlist>>>> {
    let page = params.page()?;
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::READ).await?;

    let (playlists, total) =
        PlaylistRepo::list_by_project(&state.pool, project_id, &filter, &page).await?;
    Ok(paged(playlists, total, &page))
}

/// GET /api/v1/playlists/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Playlist>>> {
    let playlist = load_playlist(&state, id).await?;
    verify_project_access(&state, &user, playlist.project_id, thresholds::READ).await?;
    Ok(ok(playlist))
}

/// PATCH /api/v1/playlists/{id}
///
/// `version_codes`, when present, replaces the whole list.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<UpdatePlaylist>,
) -> AppResult<Json<ApiResponse<Playlist>>> {
    let current = load_playlist(&state, id).await?;
    verify_project_access(&state, &user, current.project_id, thresholds::WRITE).await?;

    let codes = match &input.version_codes {
        Some(codes) => Some(resolve_codes(&state, current.project_id, codes).await?),
        None => None,
    };

    let playlist = PlaylistRepo::update(&state.pool, id, &input, codes.as_deref())
        .await?
        .ok_or_else(|| not_found("Playlist", id))?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::UPDATE,
        EntityType::Playlist.as_str(),
        Some(id),
        serde_json::json!({
            "name": input.name,
            "description": input.description,
            "version_codes": codes,
        }),
    )
    .await;

    Ok(ok(playlist))
}

/// DELETE /api/v1/playlists/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    let playlist = load_playlist(&state, id).await?;
    verify_project_access(&state, &user, playlist.project_id, thresholds::DELETE).await?;

    if !PlaylistRepo::delete(&state.pool, id).await? {
        return Err(not_found("Playlist", id));
    }
    record_audit(
        &state,
        Some(user.user_id),
        actions::DELETE,
        EntityType::Playlist.as_str(),
        Some(id),
        serde_json::json!({ "project_id": playlist.project_id, "code": playlist.code }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/playlists/{id}/versions
///
/// The playlist's versions in playlist order.
pub async fn list_versions(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Vec<Version>>>> {
    let playlist = load_playlist(&state, id).await?;
    verify_project_access(&state, &user, playlist.project_id, thresholds::READ).await?;

    let mut versions = VersionRepo::find_by_codes(&state.pool, &playlist.version_codes).await?;
    sign_thumbnails(&state, &mut versions).await;
    Ok(ok(versions))
}

/// POST /api/v1/playlists/{id}/versions
///
/// Append codes that are not already present.
pub async fn add_versions(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<PlaylistVersionCodes>,
) -> AppResult<Json<ApiResponse<Playlist>>> {
    let playlist = load_playlist(&state, id).await?;
    verify_project_access(&state, &user, playlist.project_id, thresholds::WRITE).await?;

    let added = resolve_codes(&state, playlist.project_id, &input.version_codes).await?;
    let merged = merge_codes(&playlist.version_codes, &added);
    check_size(&merged)?;

    let updated = PlaylistRepo::set_version_codes(&state.pool, id, &merged)
        .await?
        .ok_or_else(|| not_found("Playlist", id))?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::UPDATE,
        EntityType::Playlist.as_str(),
        Some(id),
        serde_json::json!({ "added": added }),
    )
    .await;

    Ok(ok(updated))
}

/// DELETE /api/v1/playlists/{id}/versions
///
/// Codes not in the playlist are ignored.
pub async fn remove_versions(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<PlaylistVersionCodes>,
) -> AppResult<Json<ApiResponse<Playlist>>> {
    let playlist = load_playlist(&state, id).await?;
    verify_project_access(&state, &user, playlist.project_id, thresholds::WRITE).await?;

    let remaining = remove_codes(&playlist.version_codes, &input.version_codes);
    let updated = PlaylistRepo::set_version_codes(&state.pool, id, &remaining)
        .await?
        .ok_or_else(|| not_found("Playlist", id))?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::UPDATE,
        EntityType::Playlist.as_str(),
        Some(id),
        serde_json::json!({ "removed": input.version_codes }),
    )
    .await;

    Ok(ok(updated))
}
