//! Repository for the `statuses` table.

use dailies_core::types::DbId;
use sqlx::PgPool;

use crate::filter::Filter;
use crate::models::status::{CreateStatus, Status, StatusFilter, UpdateStatus};

const COLUMNS: &str = "id, code, name, color, description, applies_to, sort_order, \
                        is_active, created_at, updated_at";

/// CRUD for the global status lookup.
pub struct StatusRepo;

impl StatusRepo {
    pub async fn create(pool: &PgPool, input: &CreateStatus) -> Result<Status, sqlx::Error> {
        let query = format!(
            "INSERT INTO statuses (code, name, color, description, applies_to, sort_order, is_active)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0), COALESCE($7, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Status>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.color)
            .bind(&input.description)
            .bind(&input.applies_to)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Status>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM statuses WHERE id = $1");
        sqlx::query_as::<_, Status>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM statuses WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await
    }

    /// All statuses matching `filter`, in display order.
    pub async fn list(pool: &PgPool, filter: &StatusFilter) -> Result<Vec<Status>, sqlx::Error> {
        let f = Filter::new()
            .opt_eq_bool("is_active", filter.is_active)
            .opt_empty_or_contains("applies_to", filter.entity_type.as_deref());
        let query = format!(
            "SELECT {COLUMNS} FROM statuses {} ORDER BY sort_order ASC, id ASC",
            f.where_clause()
        );
        f.bind_as(sqlx::query_as::<_, Status>(&query))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStatus,
    ) -> Result<Option<Status>, sqlx::Error> {
        let query = format!(
            "UPDATE statuses SET
                name = COALESCE($2, name),
                color = COALESCE($3, color),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                applies_to = COALESCE($6, applies_to),
                sort_order = COALESCE($7, sort_order),
                is_active = COALESCE($8, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Status>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.color)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|d| d.as_deref()))
            .bind(&input.applies_to)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hard delete. References on other tables are set to `NULL`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM statuses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
