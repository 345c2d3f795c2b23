//! Repository for the `projects` table.

use dailies_core::access::ProjectRole;
use dailies_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, Filter, Page};
use crate::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, name, description, status_id, thumbnail_path, \
                        start_date, end_date, created_by, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project and make `created_by` its manager, in one
    /// transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        created_by: DbId,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (code, name, description, status_id, start_date, end_date, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO project_members (project_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(project.id)
            .bind(created_by)
            .bind(ProjectRole::Manager.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM projects WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await
    }

    /// List projects with filtering, sorting and pagination.
    ///
    /// When `member_id` is set only projects that user belongs to are returned.
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectFilter,
        member_id: Option<DbId>,
        page: &Page,
    ) -> Result<(Vec<Project>, i64), sqlx::Error> {
        let f = Filter::new()
            .opt_member_of(member_id)
            .opt_eq_id("status_id", filter.status_id)
            .opt_eq_id("created_by", filter.created_by)
            .search(&["code", "name"], filter.search.as_deref());
        fetch_page(pool, "projects", COLUMNS, &f, page).await
    }

    /// Update a project. Absent fields are left unchanged; nullable fields
    /// sent as `null` are cleared.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status_id = CASE WHEN $5 THEN $6 ELSE status_id END,
                start_date = CASE WHEN $7 THEN $8 ELSE start_date END,
                end_date = CASE WHEN $9 THEN $10 ELSE end_date END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|d| d.as_deref()))
            .bind(input.status_id.is_some())
            .bind(input.status_id.flatten())
            .bind(input.start_date.is_some())
            .bind(input.start_date.flatten())
            .bind(input.end_date.is_some())
            .bind(input.end_date.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project and, by cascade, everything under it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
