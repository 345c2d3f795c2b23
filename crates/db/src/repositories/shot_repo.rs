//! Repository for the `shots` table.

use dailies_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, Filter, Page};
use crate::models::shot::{CreateShot, Shot, ShotFilter, UpdateShot};

const COLUMNS: &str = "id, project_id, sequence_id, code, name, description, status_id, \
                        cut_in, cut_out, assigned_to, thumbnail_path, created_by, \
                        created_at, updated_at";

pub struct ShotRepo;

impl ShotRepo {
    /// Insert a shot. `project_id` must be the sequence's project.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        sequence_id: DbId,
        input: &CreateShot,
        created_by: DbId,
    ) -> Result<Shot, sqlx::Error> {
        let query = format!(
            "INSERT INTO shots
                (project_id, sequence_id, code, name, description, status_id,
                 cut_in, cut_out, assigned_to, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(project_id)
            .bind(sequence_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status_id)
            .bind(input.cut_in)
            .bind(input.cut_out)
            .bind(input.assigned_to)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shots WHERE id = $1");
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM shots WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await
    }

    /// Shots of one sequence. `filter.sequence_id` is ignored.
    pub async fn list_by_sequence(
        pool: &PgPool,
        sequence_id: DbId,
        filter: &ShotFilter,
        page: &Page,
    ) -> Result<(Vec<Shot>, i64), sqlx::Error> {
        let f = Self::filter(Filter::new().eq_id("sequence_id", sequence_id), filter);
        fetch_page(pool, "shots", COLUMNS, &f, page).await
    }

    /// Shots across a whole project, optionally narrowed to one sequence.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        filter: &ShotFilter,
        page: &Page,
    ) -> Result<(Vec<Shot>, i64), sqlx::Error> {
        let f = Self::filter(
            Filter::new()
                .eq_id("project_id", project_id)
                .opt_eq_id("sequence_id", filter.sequence_id),
            filter,
        );
        fetch_page(pool, "shots", COLUMNS, &f, page).await
    }

    fn filter(base: Filter, filter: &ShotFilter) -> Filter {
        base.opt_eq_id("status_id", filter.status_id)
            .opt_eq_id("assigned_to", filter.assigned_to)
            .search(&["code", "name"], filter.search.as_deref())
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateShot,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!(
            "UPDATE shots SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status_id = CASE WHEN $5 THEN $6 ELSE status_id END,
                cut_in = CASE WHEN $7 THEN $8 ELSE cut_in END,
                cut_out = CASE WHEN $9 THEN $10 ELSE cut_out END,
                assigned_to = CASE WHEN $11 THEN $12 ELSE assigned_to END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|d| d.as_deref()))
            .bind(input.status_id.is_some())
            .bind(input.status_id.flatten())
            .bind(input.cut_in.is_some())
            .bind(input.cut_in.flatten())
            .bind(input.cut_out.is_some())
            .bind(input.cut_out.flatten())
            .bind(input.assigned_to.is_some())
            .bind(input.assigned_to.flatten())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
