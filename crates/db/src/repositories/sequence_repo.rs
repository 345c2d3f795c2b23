//! Repository for the `sequences` table.

use dailies_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, Filter, Page};
use crate::models::sequence::{CreateSequence, Sequence, SequenceFilter, UpdateSequence};

const COLUMNS: &str = "id, project_id, episode_id, code, name, description, status_id, \
                        thumbnail_path, created_by, created_at, updated_at";

pub struct SequenceRepo;

impl SequenceRepo {
    /// Insert a sequence. `project_id` must be the episode's project.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        episode_id: DbId,
        input: &CreateSequence,
        created_by: DbId,
    ) -> Result<Sequence, sqlx::Error> {
        let query = format!(
            "INSERT INTO sequences (project_id, episode_id, code, name, description, status_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sequence>(&query)
            .bind(project_id)
            .bind(episode_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status_id)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Sequence>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sequences WHERE id = $1");
        sqlx::query_as::<_, Sequence>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM sequences WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_episode(
        pool: &PgPool,
        episode_id: DbId,
        filter: &SequenceFilter,
        page: &Page,
    ) -> Result<(Vec<Sequence>, i64), sqlx::Error> {
        let f = Filter::new()
            .eq_id("episode_id", episode_id)
            .opt_eq_id("status_id", filter.status_id)
            .search(&["code", "name"], filter.search.as_deref());
        fetch_page(pool, "sequences", COLUMNS, &f, page).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSequence,
    ) -> Result<Option<Sequence>, sqlx::Error> {
        let query = format!(
            "UPDATE sequences SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status_id = CASE WHEN $5 THEN $6 ELSE status_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sequence>(&query)
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
        let result = sqlx::query("DELETE FROM sequences WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
