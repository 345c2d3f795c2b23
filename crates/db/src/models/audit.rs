//! Audit log entity model and DTOs.
//!
//! Audit rows are immutable (no `updated_at`).

use dailies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for inserting a new audit log entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub user_id: Option<DbId>,
    pub action: &'static str,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
}

/// Filter parameters for querying audit logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub user_id: Option<DbId>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Maximum page size of an audit query.
pub const MAX_AUDIT_LIMIT: i64 = 500;

impl AuditQuery {
    /// Clamped `(limit, offset)` of this query.
    pub fn window(&self) -> (i64, i64) {
        (
            self.limit.unwrap_or(50).clamp(1, MAX_AUDIT_LIMIT),
            self.offset.unwrap_or(0).max(0),
        )
    }
}
