//! Handlers for the `/statuses` resource.
//!
//! Any authenticated user can read statuses; only admins change them.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dailies_core::audit::actions;
use dailies_core::codes::EntityType;
use dailies_core::status::validate_applies_to;
use dailies_db::models::status::{CreateStatus, Status, StatusFilter, UpdateStatus};
use dailies_db::repositories::StatusRepo;

use super::support::{ensure_code_free, not_found, record_audit};
use crate::error::AppResult;
use crate::extract::{AppQuery, PathId, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

/// POST /api/v1/statuses
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(input): ValidatedJson<CreateStatus>,
) -> AppResult<(StatusCode, Json<ApiResponse<Status>>)> {
    validate_applies_to(&input.applies_to)?;
    ensure_code_free(
        StatusRepo::code_exists(&state.pool, &input.code).await?,
        "Status",
        &input.code,
    )?;

    let status = StatusRepo::create(&state.pool, &input).await?;
    record_audit(
        &state,
        Some(admin.user_id),
        actions::CREATE,
        "status",
        Some(status.id),
        serde_json::json!({ "code": status.code }),
    )
    .await;

    Ok((StatusCode::CREATED, ok(status)))
}

/// GET /api/v1/statuses
///
/// `?entity_type=shot` keeps statuses usable on shots (including those
/// with an empty `applies_to`); `?is_active=true` hides retired ones.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    AppQuery(filter): AppQuery<StatusFilter>,
) -> AppResult<Json<ApiResponse<Vec<Status>>>> {
    if let Some(entity_type) = &filter.entity_type {
        EntityType::parse(entity_type)?;
    }
    let statuses = StatusRepo::list(&state.pool, &filter).await?;
    Ok(ok(statuses))
}

/// GET /api/v1/statuses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Status>>> {
    let status = StatusRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Status", id))?;
    Ok(ok(status))
}

/// PATCH /api/v1/statuses/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<UpdateStatus>,
) -> AppResult<Json<ApiResponse<Status>>> {
    if let Some(applies_to) = &input.applies_to {
        validate_applies_to(applies_to)?;
    }
    let status = StatusRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Status", id))?;

    record_audit(
        &state,
        Some(admin.user_id),
        actions::UPDATE,
        "status",
        Some(id),
        serde_json::json!({
            "name": input.name,
            "color": input.color,
            "applies_to": input.applies_to,
            "is_active": input.is_active,
        }),
    )
    .await;
    Ok(ok(status))
}

/// DELETE /api/v1/statuses/{id}
///
/// Entities using the status keep existing with `status_id = null`.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    if !StatusRepo::delete(&state.pool, id).await? {
        return Err(not_found("Status", id));
    }
    record_audit(
        &state,
        Some(admin.user_id),
        actions::DELETE,
        "status",
        Some(id),
        serde_json::Value::Null,
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}
