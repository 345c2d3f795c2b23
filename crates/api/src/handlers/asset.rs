//! Handlers for assets (`/projects/{id}/assets`, `/assets/{id}`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dailies_core::access::thresholds;
use dailies_core::audit::actions;
use dailies_core::codes::{validate_asset_type, EntityType};
use dailies_core::types::DbId;
use dailies_db::models::asset::{Asset, AssetFilter, CreateAsset, UpdateAsset};
use dailies_db::repositories::AssetRepo;

use super::project::load_project;
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

async fn load_asset(state: &AppState, id: DbId) -> AppResult<Asset> {
    AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Asset", id))
}

/// POST /api/v1/projects/{id}/assets
///
/// `asset_type` defaults to `other`.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    ValidatedJson(input): ValidatedJson<CreateAsset>,
) -> AppResult<(StatusCode, Json<ApiResponse<Asset>>)> {
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::WRITE).await?;

    if let Some(asset_type) = &input.asset_type {
        validate_asset_type(asset_type)?;
    }
    check_status(&state, input.status_id, EntityType::Asset).await?;
    check_user(&state, input.assigned_to).await?;
    ensure_code_free(
        AssetRepo::code_exists(&state.pool, &input.code).await?,
        "Asset",
        &input.code,
    )?;

    let asset = AssetRepo::create(&state.pool, project_id, &input, user.user_id).await?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::CREATE,
        EntityType::Asset.as_str(),
        Some(asset.id),
        serde_json::json!({
            "project_id": project_id,
            "code": asset.code,
            "asset_type": asset.asset_type,
        }),
    )
    .await;

    Ok((StatusCode::CREATED, ok(asset)))
}

/// GET /api/v1/projects/{id}/assets
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    AppQuery(params): AppQuery<ListParams>,
    AppQuery(filter): AppQuery<AssetFilter>,
) -> AppResult<Json<ApiResponse<Vec<Asset>>>> {
    let page = params.page()?;
    if let Some(asset_type) = &filter.asset_type {
        validate_asset_type(asset_type)?;
    }
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::READ).await?;

    let (mut assets, total) =
        AssetRepo::list_by_project(&state.pool, project_id, &filter, &page).await?;
    sign_thumbnails(&state, &mut assets).await;
    Ok(paged(assets, total, &page))
}

/// GET /api/v1/assets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Asset>>> {
    let mut asset = load_asset(&state, id).await?;
    verify_project_access(&state, &user, asset.project_id, thresholds::READ).await?;
    sign_thumbnail(&state, &mut asset).await;
    Ok(ok(asset))
}

/// PATCH /api/v1/assets/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<UpdateAsset>,
) -> AppResult<Json<ApiResponse<Asset>>> {
    let current = load_asset(&state, id).await?;
    verify_project_access(&state, &user, current.project_id, thresholds::WRITE).await?;

    if let Some(asset_type) = &input.asset_type {
        validate_asset_type(asset_type)?;
    }
    check_status(&state, input.status_id.flatten(), EntityType::Asset).await?;
    check_user(&state, input.assigned_to.flatten()).await?;

    let mut asset = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Asset", id))?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::UPDATE,
        EntityType::Asset.as_str(),
        Some(id),
        serde_json::json!({
            "name": input.name,
            "asset_type": input.asset_type,
            "description": input.description,
            "status_id": input.status_id,
            "assigned_to": input.assigned_to,
        }),
    )
    .await;

    sign_thumbnail(&state, &mut asset).await;
    Ok(ok(asset))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    let asset = load_asset(&state, id).await?;
    verify_project_access(&state, &user, asset.project_id, thresholds::DELETE).await?;

    if !AssetRepo::delete(&state.pool, id).await? {
        return Err(not_found("Asset", id));
    }
    discard_thumbnail(&state, asset.thumbnail_path.as_deref()).await;
    record_audit(
        &state,
        Some(user.user_id),
        actions::DELETE,
        EntityType::Asset.as_str(),
        Some(id),
        serde_json::json!({ "project_id": asset.project_id, "code": asset.code }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
