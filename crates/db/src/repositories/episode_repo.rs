//! Repository for the `episodes` table.

use dailies_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, Filter, Page};
use crate::models::episode::{CreateEpisode, Episode, EpisodeFilter, UpdateEpisode};

const COLUMNS: &str = "id, project_id, code, name, description, status_id, thumbnail_path, \
                        created_by, created_at, updated_at";

pub struct EpisodeRepo;

impl EpisodeRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateEpisode,
        created_by: DbId,
    ) -> Result<Episode, sqlx::Error> {
        let query = format!(
            "INSERT INTO episodes (project_id, code, name, description, status_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(project_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status_id)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM episodes WHERE id = $1");
        sqlx::query_as::<_, Episode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM episodes WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await
    }

    /// Episodes of a project, filtered, sorted and paginated.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        filter: &EpisodeFilter,
        page: &Page,
    ) -> Result<(Vec<Episode>, i64), sqlx::Error> {
        let f = Filter::new()
            .eq_id("project_id", project_id)
            .opt_eq_id("status_id", filter.status_id)
            .opt_eq_id("created_by", filter.created_by)
            .search(&["code", "name"], filter.search.as_deref());
        fetch_page(pool, "episodes", COLUMNS, &f, page).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEpisode,
    ) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!(
            "UPDATE episodes SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status_id = CASE WHEN $5 THEN $6 ELSE status_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|d| d.as_deref()))
            .bind(input.status_id.is_some())
            .bind(input.status_id.flatten())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM episodes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
