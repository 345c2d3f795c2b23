//! Repository for the `audit_logs` table.

use sqlx::PgPool;

use crate::filter::Filter;
use crate::models::audit::{AuditLog, AuditQuery, CreateAuditLog};

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str = "id, user_id, action, entity_type, entity_id, details, created_at";

/// Provides insert and query operations for audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one audit log entry.
    pub async fn insert(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs (user_id, action, entity_type, entity_id, details)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.user_id)
            .bind(entry.action)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.details)
            .fetch_one(pool)
            .await
    }

    /// Query audit logs with filtering and pagination, newest first.
    pub async fn query(pool: &PgPool, params: &AuditQuery) -> Result<Vec<AuditLog>, sqlx::Error> {
        let (limit, offset) = params.window();

        let filter = build_audit_filter(params);
        let bind_idx = filter.bind_count() + 1;
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            filter.where_clause(),
            bind_idx + 1
        );

        filter
            .bind_as(sqlx::query_as::<_, AuditLog>(&query))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count audit logs matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &AuditQuery) -> Result<i64, sqlx::Error> {
        let filter = build_audit_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT AS count FROM audit_logs {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }
}

fn build_audit_filter(params: &AuditQuery) -> Filter {
    Filter::new()
        .opt_eq_id("user_id", params.user_id)
        .opt_eq_text("action", params.action.as_deref())
        .opt_eq_text("entity_type", params.entity_type.as_deref())
        .opt_eq_id("entity_id", params.entity_id)
        .opt_since("created_at", params.from)
        .opt_until("created_at", params.to)
}
