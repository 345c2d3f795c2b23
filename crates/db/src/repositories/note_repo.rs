//! Repository for the `notes` table.

use dailies_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, Filter, Page};
use crate::models::note::{CreateNote, Note, NoteFilter, UpdateNote};

const COLUMNS: &str = "id, project_id, entity_type, entity_id, subject, content, author_id, \
                        created_at, updated_at";

pub struct NoteRepo;

impl NoteRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateNote,
        author_id: DbId,
    ) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (project_id, entity_type, entity_id, subject, content, author_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(project_id)
            .bind(input.entity_type.as_str())
            .bind(input.entity_id)
            .bind(&input.subject)
            .bind(&input.content)
            .bind(author_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Notes of a project. Notes have no code or name, so those sort keys
    /// fall back to `subject`.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        filter: &NoteFilter,
        page: &Page,
    ) -> Result<(Vec<Note>, i64), sqlx::Error> {
        let f = Filter::new()
            .eq_id("project_id", project_id)
            .opt_eq_text("entity_type", filter.entity_type.as_deref())
            .opt_eq_id("entity_id", filter.entity_id)
            .opt_eq_id("author_id", filter.author_id)
            .search(&["subject", "content"], filter.search.as_deref());
        let page = page.remap_sort("subject", "subject");
        fetch_page(pool, "notes", COLUMNS, &f, &page).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                subject = COALESCE($2, subject),
                content = COALESCE($3, content)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(&input.subject)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
