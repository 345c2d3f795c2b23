//! Handlers for versions (`/projects/{id}/versions`, `/versions/{id}`,
//! `/versions/by-entity/{entity_type}/{entity_code}`).
//!
//! A version targets an entity by (`entity_type`, `entity_code`). The target
//! must exist in the same project when the version is published; afterwards
//! the reference is not enforced.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dailies_core::access::thresholds;
use dailies_core::audit::actions;
use dailies_core::codes::{default_version_code, EntityType};
use dailies_core::error::CoreError;
use dailies_core::types::DbId;
use dailies_db::models::version::{
    CreateVersion, NewVersion, UpdateVersion, Version, VersionFilter,
};
use dailies_db::repositories::{EntityLookup, VersionRepo};

use super::project::load_project;
use super::support::{
    check_status, discard_thumbnail, ensure_code_free, not_found, record_audit, sign_thumbnail,
    sign_thumbnails,
};
use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery, PathId, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::project_access::verify_project_access;
use crate::query::ListParams;
use crate::response::{ok, paged, ApiResponse};
use crate::state::AppState;

async fn load_version(state: &AppState, id: DbId) -> AppResult<Version> {
    VersionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Version", id))
}

/// Project owning the versionable entity `entity_type`/`entity_code`.
async fn target_project(
    state: &AppState,
    entity_type: EntityType,
    entity_code: &str,
) -> AppResult<DbId> {
    EntityLookup::project_id_for_code(&state.pool, entity_type, entity_code)
        .await?
        .ok_or_else(|| target_not_found(entity_type, entity_code))
}

fn target_not_found(entity_type: EntityType, entity_code: &str) -> AppError {
    AppError::Core(CoreError::NotFoundByCode {
        entity: entity_type.label(),
        code: entity_code.to_string(),
    })
}

/// POST /api/v1/projects/{id}/versions
///
/// Allocates the next `version_number` for the target entity. `code`
/// defaults to `{entity_code}_v{nnn}` and `name` to the code. A default that
/// is too long or already taken is refused; the client then sends a code.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    ValidatedJson(input): ValidatedJson<CreateVersion>,
) -> AppResult<(StatusCode, Json<ApiResponse<Version>>)> {
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::WRITE).await?;

    if !input.entity_type.is_versionable() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Versions cannot be attached to entity type '{}'",
            input.entity_type
        ))));
    }
    let owner = target_project(&state, input.entity_type, &input.entity_code).await?;
    if owner != project_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{} '{}' does not belong to project {project_id}",
            input.entity_type.label(),
            input.entity_code
        ))));
    }
    check_status(&state, input.status_id, EntityType::Version).await?;

    let version_number =
        VersionRepo::next_version_number(&state.pool, input.entity_type, &input.entity_code)
            .await?;
    let code = match &input.code {
        Some(code) => {
            ensure_code_free(
                VersionRepo::code_exists(&state.pool, code).await?,
                "Version",
                code,
            )?;
            code.clone()
        }
        None => {
            let code = default_version_code(&input.entity_code, version_number)?;
            // Entity codes are only unique per table, so a same-coded entity
            // of another type may already own this default.
            if VersionRepo::code_exists(&state.pool, &code).await? {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Default version code '{code}' is already taken; send an explicit code"
                ))));
            }
            code
        }
    };

    let new = NewVersion {
        project_id,
        name: input.name.clone().unwrap_or_else(|| code.clone()),
        code,
        entity_type: input.entity_type,
        entity_code: input.entity_code.clone(),
        version_number,
        description: input.description.clone(),
        file_path: input.file_path.clone(),
        status_id: input.status_id,
        created_by: Some(user.user_id),
    };
    let version = VersionRepo::create(&state.pool, &new).await?;

    record_audit(
        &state,
        Some(user.user_id),
        actions::CREATE,
        EntityType::Version.as_str(),
        Some(version.id),
        serde_json::json!({
            "project_id": project_id,
            "code": version.code,
            "entity_type": version.entity_type,
            "entity_code": version.entity_code,
            "version_number": version_number,
        }),
    )
    .await;
    tracing::info!(
        version_id = version.id,
        code = %version.code,
        entity_type = %input.entity_type,
        entity_code = %input.entity_code,
        version_number,
        "Version published",
    );

    Ok((StatusCode::CREATED, ok(version)))
}

/// GET /api/v1/projects/{id}/versions
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    AppQuery(params): AppQuery<ListParams>,
    AppQuery(filter): AppQuery<VersionFilter>,
) -> AppResult<Json<ApiResponse<Vec<Version>>>> {
    let page = params.page()?;
    if let Some(entity_type) = &filter.entity_type {
        EntityType::parse(entity_type)?;
    }
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::READ).await?;

    let (mut versions, total) =
        VersionRepo::list_by_project(&state.pool, project_id, &filter, &page).await?;
    sign_thumbnails(&state, &mut versions).await;
    Ok(paged(versions, total, &page))
}

/// GET /api/v1/versions/by-entity/{entity_type}/{entity_code}
///
/// Every version of one entity, newest first. Unpaginated.
///
/// Versions outlive their target: once the entity is deleted the versions'
/// own project decides access. Only versions of that project are returned.
pub async fn list_by_entity(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath((entity_type, entity_code)): AppPath<(String, String)>,
) -> AppResult<Json<ApiResponse<Vec<Version>>>> {
    let entity_type = EntityType::parse_versionable(&entity_type)?;
    let mut versions = VersionRepo::list_by_entity(&state.pool, entity_type, &entity_code).await?;

    let project_id = match EntityLookup::project_id_for_code(&state.pool, entity_type, &entity_code)
        .await?
    {
        Some(id) => id,
        None => versions
            .first()
            .map(|v| v.project_id)
            .ok_or_else(|| target_not_found(entity_type, &entity_code))?,
    };
    verify_project_access(&state, &user, project_id, thresholds::READ).await?;

    versions.retain(|v| v.project_id == project_id);
    sign_thumbnails(&state, &mut versions).await;
    Ok(ok(versions))
}

/// GET /api/v1/versions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Version>>> {
    let mut version = load_version(&state, id).await?;
    verify_project_access(&state, &user, version.project_id, thresholds::READ).await?;
    sign_thumbnail(&state, &mut version).await;
    Ok(ok(version))
}

/// PATCH /api/v1/versions/{id}
///
/// Code, target and number are fixed once published.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<UpdateVersion>,
) -> AppResult<Json<ApiResponse<Version>>> {
    let current = load_version(&state, id).await?;
    verify_project_access(&state, &user, current.project_id, thresholds::WRITE).await?;
    check_status(&state, input.status_id.flatten(), EntityType::Version).await?;

    let mut version = VersionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Version", id))?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::UPDATE,
        EntityType::Version.as_str(),
        Some(id),
        serde_json::json!({
            "name": input.name,
            "description": input.description,
            "file_path": input.file_path,
            "status_id": input.status_id,
        }),
    )
    .await;

    sign_thumbnail(&state, &mut version).await;
    Ok(ok(version))
}

/// DELETE /api/v1/versions/{id}
///
/// Playlists keep the code; it is dropped from their listings.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    let version = load_version(&state, id).await?;
    verify_project_access(&state, &user, version.project_id, thresholds::DELETE).await?;

    if !VersionRepo::delete(&state.pool, id).await? {
        return Err(not_found("Version", id));
    }
    discard_thumbnail(&state, version.thumbnail_path.as_deref()).await;
    record_audit(
        &state,
        Some(user.user_id),
        actions::DELETE,
        EntityType::Version.as_str(),
        Some(id),
        serde_json::json!({ "project_id": version.project_id, "code": version.code }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
