//! Repository for the `versions` table.

use dailies_core::codes::EntityType;
use dailies_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, Filter, Page};
use crate::models::version::{NewVersion, UpdateVersion, Version, VersionFilter};

const COLUMNS: &str = "id, project_id, code, name, entity_type, entity_code, version_number, \
                        description, file_path, status_id, thumbnail_path, created_by, \
                        created_at, updated_at";

pub struct VersionRepo;

impl VersionRepo {
    pub async fn create(pool: &PgPool, input: &NewVersion) -> Result<Version, sqlx::Error> {
        let query = format!(
            "INSERT INTO versions
                (project_id, code, name, entity_type, entity_code, version_number,
                 description, file_path, status_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(input.project_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.entity_type.as_str())
            .bind(&input.entity_code)
            .bind(input.version_number)
            .bind(&input.description)
            .bind(&input.file_path)
            .bind(input.status_id)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Version>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM versions WHERE id = $1");
        sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM versions WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await
    }

    /// The number the next version of an entity should get: one past the
    /// highest existing number, starting at 1.
    pub async fn next_version_number(
        pool: &PgPool,
        entity_type: EntityType,
        entity_code: &str,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(version_number), 0) + 1 FROM versions
             WHERE entity_type = $1 AND entity_code = $2",
        )
        .bind(entity_type.as_str())
        .bind(entity_code)
        .fetch_one(pool)
        .await
    }

    /// Versions with any of `codes`, returned in the order of `codes`.
    /// Codes with no matching version are skipped.
    pub async fn find_by_codes(pool: &PgPool, codes: &[String]) -> Result<Vec<Version>, sqlx::Error> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM versions v
             JOIN unnest($1::text[]) WITH ORDINALITY AS o(wanted_code, pos) ON o.wanted_code = v.code
             ORDER BY o.pos"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(codes)
            .fetch_all(pool)
            .await
    }

    /// Versions of one entity, newest first.
    pub async fn list_by_entity(
        pool: &PgPool,
        entity_type: EntityType,
        entity_code: &str,
    ) -> Result<Vec<Version>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM versions
             WHERE entity_type = $1 AND entity_code = $2
             ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(entity_type.as_str())
            .bind(entity_code)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        filter: &VersionFilter,
        page: &Page,
    ) -> Result<(Vec<Version>, i64), sqlx::Error> {
        let f = Filter::new()
            .eq_id("project_id", project_id)
            .opt_eq_text("entity_type", filter.entity_type.as_deref())
            .opt_eq_text("entity_code", filter.entity_code.as_deref())
            .opt_eq_id("status_id", filter.status_id)
            .opt_eq_id("created_by", filter.created_by)
            .search(&["code", "name"], filter.search.as_deref());
        fetch_page(pool, "versions", COLUMNS, &f, page).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVersion,
    ) -> Result<Option<Version>, sqlx::Error> {
        let query = format!(
            "UPDATE versions SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                file_path = CASE WHEN $5 THEN $6 ELSE file_path END,
                status_id = CASE WHEN $7 THEN $8 ELSE status_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|d| d.as_deref()))
            .bind(input.file_path.is_some())
            .bind(input.file_path.as_ref().and_then(|p| p.as_deref()))
            .bind(input.status_id.is_some())
            .bind(input.status_id.flatten())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM versions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
