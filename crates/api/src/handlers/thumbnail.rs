//! Thumbnail upload for every entity that carries one.
//!
//! `PUT /api/v1/{projects|episodes|sequences|shots|assets|versions}/{id}/thumbnail`
//! takes a multipart form with a single `file` field (`image/png`,
//! `image/jpeg` or `image/webp`). The image is stored under
//! `thumbnails/{entity_type}/{code}.{ext}` and the row's `thumbnail_path` is
//! repointed at it.

use axum::extract::{Multipart, State};
use axum::Json;
use dailies_core::access::thresholds;
use dailies_core::audit::actions;
use dailies_core::codes::EntityType;
use dailies_core::storage::{image_extension, thumbnail_key};
use dailies_core::types::DbId;
use dailies_db::repositories::EntityLookup;
use serde::Serialize;

use super::support::{discard_thumbnail, not_found, record_audit};
use crate::error::{AppError, AppResult};
use crate::extract::PathId;
use crate::middleware::auth::AuthUser;
use crate::middleware::project_access::verify_project_access;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;
use crate::storage::StorageError;

#[derive(Debug, Serialize)]
pub struct ThumbnailResponse {
    pub entity_type: EntityType,
    pub entity_id: DbId,
    pub thumbnail_path: String,
    pub thumbnail_url: String,
}

/// The `file` field of the upload form: content type and bytes.
async fn read_image(multipart: &mut Multipart, limit: usize) -> AppResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("The 'file' field has no content type".into()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if data.is_empty() {
            return Err(AppError::BadRequest("The uploaded file is empty".into()));
        }
        if data.len() > limit {
            return Err(StorageError::TooLarge {
                actual: data.len(),
                limit,
            }
            .into());
        }
        return Ok((content_type, data.to_vec()));
    }
    Err(AppError::BadRequest("Missing required 'file' field".into()))
}

async fn upload(
    state: AppState,
    user: AuthUser,
    entity_type: EntityType,
    id: DbId,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<ThumbnailResponse>>> {
    let project_id = EntityLookup::project_id_for_id(&state.pool, entity_type, id)
        .await?
        .ok_or_else(|| not_found(entity_type.label(), id))?;
    let required = if entity_type == EntityType::Project {
        thresholds::MANAGE
    } else {
        thresholds::WRITE
    };
    verify_project_access(&state, &user, project_id, required).await?;

    let (content_type, bytes) =
        read_image(&mut multipart, state.config.storage.max_thumbnail_bytes).await?;
    let extension = image_extension(&content_type)?;
    let code = EntityLookup::code_for_id(&state.pool, entity_type, id)
        .await?
        .ok_or_else(|| not_found(entity_type.label(), id))?;
    let previous = EntityLookup::thumbnail_path_for_id(&state.pool, entity_type, id).await?;

    let size = bytes.len();
    let key = thumbnail_key(entity_type, &code, extension);
    let path = state.storage.put(&key, &content_type, bytes).await?;
    let stored = path.to_string();

    if !EntityLookup::set_thumbnail_path(&state.pool, entity_type, id, &stored).await? {
        discard_thumbnail(&state, Some(&stored)).await;
        return Err(not_found(entity_type.label(), id));
    }
    if previous.as_deref().is_some_and(|p| p != stored) {
        discard_thumbnail(&state, previous.as_deref()).await;
    }

    record_audit(
        &state,
        Some(user.user_id),
        actions::THUMBNAIL_UPLOAD,
        entity_type.as_str(),
        Some(id),
        serde_json::json!({ "path": stored, "content_type": content_type, "size": size }),
    )
    .await;
    tracing::info!(
        entity_type = %entity_type,
        entity_id = id,
        path = %stored,
        size,
        "Thumbnail uploaded",
    );

    let thumbnail_url = state.storage.signed_url(&path).await?;
    Ok(ok(ThumbnailResponse {
        entity_type,
        entity_id: id,
        thumbnail_path: stored,
        thumbnail_url,
    }))
}

/// PUT /api/v1/projects/{id}/thumbnail
pub async fn upload_project(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<ThumbnailResponse>>> {
    upload(state, user, EntityType::Project, id, multipart).await
}

/// PUT /api/v1/episodes/{id}/thumbnail
pub async fn upload_episode(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<ThumbnailResponse>>> {
    upload(state, user, EntityType::Episode, id, multipart).await
}

/// PUT /api/v1/sequences/{id}/thumbnail
pub async fn upload_sequence(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<ThumbnailResponse>>> {
    upload(state, user, EntityType::Sequence, id, multipart).await
}

/// PUT /api/v1/shots/{id}/thumbnail
pub async fn upload_shot(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<ThumbnailResponse>>> {
    upload(state, user, EntityType::Shot, id, multipart).await
}

/// PUT /api/v1/assets/{id}/thumbnail
pub async fn upload_asset(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<ThumbnailResponse>>> {
    upload(state, user, EntityType::Asset, id, multipart).await
}

/// PUT /api/v1/versions/{id}/thumbnail
pub async fn upload_version(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<ThumbnailResponse>>> {
    upload(state, user, EntityType::Version, id, multipart).await
}
