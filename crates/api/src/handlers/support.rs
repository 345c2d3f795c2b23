//! Lookups and post-processing shared by the entity handlers.

use dailies_core::audit::redact_sensitive_fields;
use dailies_core::codes::EntityType;
use dailies_core::error::CoreError;
use dailies_core::status::check_status_applies;
use dailies_core::storage::StoragePath;
use dailies_core::types::DbId;
use dailies_db::models::audit::CreateAuditLog;
use dailies_db::models::HasThumbnail;
use dailies_db::repositories::{AuditLogRepo, StatusRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// 409 when `taken`. The unique constraint still backs this up under races.
pub(crate) fn ensure_code_free(taken: bool, entity: &str, code: &str) -> AppResult<()> {
    if taken {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "{entity} with code '{code}' already exists"
        ))));
    }
    Ok(())
}

/// Check that a referenced status exists (404), is active and may be used
/// on `entity_type` (400). `None` passes.
pub(crate) async fn check_status(
    state: &AppState,
    status_id: Option<DbId>,
    entity_type: EntityType,
) -> AppResult<()> {
    let Some(id) = status_id else {
        return Ok(());
    };
    let status = StatusRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Status", id))?;
    check_status_applies(&status.code, status.is_active, &status.applies_to, entity_type)?;
    Ok(())
}

/// Check that a referenced user exists (404). `None` passes.
pub(crate) async fn check_user(state: &AppState, user_id: Option<DbId>) -> AppResult<()> {
    match user_id {
        Some(id) if !UserRepo::exists(&state.pool, id).await? => Err(not_found("User", id)),
        _ => Ok(()),
    }
}

/// Fill `thumbnail_url` from the stored path with a fresh signed link.
///
/// A broken path or a signing failure leaves the URL empty rather than
/// failing the read.
pub(crate) async fn sign_thumbnail<T: HasThumbnail>(state: &AppState, row: &mut T) {
    let url = match row.thumbnail_path() {
        None => None,
        Some(raw) => match StoragePath::parse(raw) {
            Ok(path) => match state.storage.signed_url(&path).await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Failed to sign thumbnail URL");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = raw, error = %e, "Stored thumbnail path is invalid");
                None
            }
        },
    };
    row.set_thumbnail_url(url);
}

pub(crate) async fn sign_thumbnails<T: HasThumbnail>(state: &AppState, rows: &mut [T]) {
    for row in rows.iter_mut() {
        sign_thumbnail(state, row).await;
    }
}

/// Append an audit row. Failures are logged, never surfaced to the caller.
pub(crate) async fn record_audit(
    state: &AppState,
    user_id: Option<DbId>,
    action: &'static str,
    entity_type: &str,
    entity_id: Option<DbId>,
    details: serde_json::Value,
) {
    let entry = CreateAuditLog {
        user_id,
        action,
        entity_type: entity_type.to_string(),
        entity_id,
        details: redact_sensitive_fields(&details),
    };
    if let Err(e) = AuditLogRepo::insert(&state.pool, &entry).await {
        tracing::warn!(
            action,
            entity_type,
            ?entity_id,
            error = %e,
            "Failed to write audit log",
        );
    }
}

/// Remove a replaced or orphaned thumbnail object. Failures are logged.
pub(crate) async fn discard_thumbnail(state: &AppState, stored: Option<&str>) {
    let Some(raw) = stored else {
        return;
    };
    let Ok(path) = StoragePath::parse(raw) else {
        return;
    };
    if let Err(e) = state.storage.delete(&path).await {
        tracing::warn!(path = %path, error = %e, "Failed to delete thumbnail object");
    }
}
