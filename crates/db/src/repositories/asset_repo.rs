//! Repository for the `assets` table.

use dailies_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, Filter, Page};
use crate::models::asset::{Asset, AssetFilter, CreateAsset, UpdateAsset};

const COLUMNS: &str = "id, project_id, code, name, asset_type, description, status_id, \
                        assigned_to, thumbnail_path, created_by, created_at, updated_at";

pub struct AssetRepo;

impl AssetRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateAsset,
        created_by: DbId,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets
                (project_id, code, name, asset_type, description, status_id, assigned_to, created_by)
             VALUES ($1, $2, $3, COALESCE($4, 'other'), $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(project_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.asset_type)
            .bind(&input.description)
            .bind(input.status_id)
            .bind(input.assigned_to)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM assets WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        filter: &AssetFilter,
        page: &Page,
    ) -> Result<(Vec<Asset>, i64), sqlx::Error> {
        let f = Filter::new()
            .eq_id("project_id", project_id)
            .opt_eq_text("asset_type", filter.asset_type.as_deref())
            .opt_eq_id("status_id", filter.status_id)
            .opt_eq_id("assigned_to", filter.assigned_to)
            .search(&["code", "name"], filter.search.as_deref());
        fetch_page(pool, "assets", COLUMNS, &f, page).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                name = COALESCE($2, name),
                asset_type = COALESCE($3, asset_type),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                status_id = CASE WHEN $6 THEN $7 ELSE status_id END,
                assigned_to = CASE WHEN $8 THEN $9 ELSE assigned_to END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.asset_type)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|d| d.as_deref()))
            .bind(input.status_id.is_some())
            .bind(input.status_id.flatten())
            .bind(input.assigned_to.is_some())
            .bind(input.assigned_to.flatten())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
