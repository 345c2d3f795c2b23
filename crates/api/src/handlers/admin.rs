//! Handlers for the `/admin` resource (user management and audit trail).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dailies_core::audit::actions;
use dailies_core::error::CoreError;
use dailies_core::roles::DEFAULT_ROLE_ID;
use dailies_core::types::DbId;
use dailies_db::models::audit::{AuditLog, AuditQuery};
use dailies_db::models::user::{CreateUser, UpdateUser, User, UserFilter, UserResponse};
use dailies_db::repositories::{AuditLogRepo, RoleRepo, SessionRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use super::support::{not_found, record_audit};
use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery, PathId, ValidatedJson};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::response::{ok, ApiResponse, Pagination};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub display_name: String,
    pub password: String,
    /// Defaults to `artist`.
    pub role_id: Option<DbId>,
}

/// Request body for `PATCH /admin/users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub display_name: Option<String>,
    pub role_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(input): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role_id = input.role_id.unwrap_or(DEFAULT_ROLE_ID);
    let role = RoleRepo::find_by_id(&state.pool, role_id)
        .await?
        .ok_or_else(|| not_found("Role", role_id))?;

    ensure_email_free(&state, &input.email, None).await?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            display_name: input.display_name,
            password_hash: hashed,
            role_id,
        },
    )
    .await?;

    record_audit(
        &state,
        Some(admin.user_id),
        actions::CREATE,
        "user",
        Some(user.id),
        serde_json::json!({ "email": user.email, "role": role.name }),
    )
    .await;
    tracing::info!(user_id = user.id, admin_id = admin.user_id, "User created");

    Ok((
        StatusCode::CREATED,
        ok(UserResponse::from_user(&user, role.name)),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(params): AppQuery<ListParams>,
    AppQuery(filter): AppQuery<UserFilter>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let page = params.page()?;
    let (users, total) = UserRepo::list(&state.pool, &filter, &page).await?;

    let mut data = Vec::with_capacity(users.len());
    for user in &users {
        data.push(to_response(&state, user).await?);
    }
    Ok(Json(ApiResponse::paginated(data, total, &page)))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = find_user(&state, id).await?;
    Ok(ok(to_response(&state, &user).await?))
}

/// PATCH /api/v1/admin/users/{id}
///
/// Deactivating a user also revokes their sessions. Admins cannot
/// deactivate themselves.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    find_user(&state, id).await?;

    if id == admin.user_id && input.is_active == Some(false) {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot deactivate your own account".into(),
        )));
    }
    if let Some(role_id) = input.role_id {
        RoleRepo::find_by_id(&state.pool, role_id)
            .await?
            .ok_or_else(|| not_found("Role", role_id))?;
    }
    if let Some(email) = &input.email {
        ensure_email_free(&state, email, Some(id)).await?;
    }

    let update = UpdateUser {
        email: input.email,
        display_name: input.display_name,
        role_id: input.role_id,
        is_active: input.is_active,
    };
    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| not_found("User", id))?;

    if update.is_active == Some(false) {
        SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    }

    record_audit(
        &state,
        Some(admin.user_id),
        actions::UPDATE,
        "user",
        Some(id),
        serde_json::json!({
            "email": update.email,
            "display_name": update.display_name,
            "role_id": update.role_id,
            "is_active": update.is_active,
        }),
    )
    .await;

    Ok(ok(to_response(&state, &user).await?))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Hard delete. References from other rows (`created_by`, `assigned_to`,
/// `author_id`) are nulled by the database.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot delete your own account".into(),
        )));
    }
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(not_found("User", id));
    }
    record_audit(
        &state,
        Some(admin.user_id),
        actions::DELETE,
        "user",
        Some(id),
        serde_json::Value::Null,
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/reset-password
///
/// Set a new password, clear any lockout and revoke the user's sessions.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    PathId(id): PathId,
    AppJson(input): AppJson<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, id, &hashed).await? {
        return Err(not_found("User", id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    record_audit(
        &state,
        Some(admin.user_id),
        actions::UPDATE,
        "user",
        Some(id),
        serde_json::json!({ "password": "reset" }),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Audit trail
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/audit-logs
///
/// Filters: `user_id`, `action`, `entity_type`, `entity_id`, `from`, `to`
/// (RFC 3339), plus `limit` (max 500) and `offset`. Newest first.
pub async fn list_audit_logs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(params): AppQuery<AuditQuery>,
) -> AppResult<Json<ApiResponse<Vec<AuditLog>>>> {
    let logs = AuditLogRepo::query(&state.pool, &params).await?;
    let total = AuditLogRepo::count(&state.pool, &params).await?;
    let (limit, offset) = params.window();

    Ok(Json(ApiResponse::with_pagination(
        logs,
        Pagination {
            total,
            limit,
            offset,
        },
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("User", id))
}

async fn to_response(state: &AppState, user: &User) -> AppResult<UserResponse> {
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(UserResponse::from_user(user, role))
}

/// 409 when another account already uses `email` (case-insensitive).
async fn ensure_email_free(state: &AppState, email: &str, except: Option<DbId>) -> AppResult<()> {
    if let Some(existing) = UserRepo::find_by_email(&state.pool, email).await? {
        if Some(existing.id) != except {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "A user with email '{email}' already exists"
            ))));
        }
    }
    Ok(())
}
