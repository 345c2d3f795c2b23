//! Repository for the `playlists` table.

use dailies_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, Filter, Page};
use crate::models::playlist::{CreatePlaylist, Playlist, PlaylistFilter, UpdatePlaylist};

const COLUMNS: &str = "id, project_id, code, name, description, version_codes, created_by, \
                        created_at, updated_at";

pub struct PlaylistRepo;

impl PlaylistRepo {
    /// Insert a playlist. `version_codes` must already be deduplicated and
    /// checked against existing versions.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreatePlaylist,
        version_codes: &[String],
        created_by: DbId,
    ) -> Result<Playlist, sqlx::Error> {
        let query = format!(
            "INSERT INTO playlists (project_id, code, name, description, version_codes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(project_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(version_codes)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM playlists WHERE id = $1");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM playlists WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        filter: &PlaylistFilter,
        page: &Page,
    ) -> Result<(Vec<Playlist>, i64), sqlx::Error> {
        let f = Filter::new()
            .eq_id("project_id", project_id)
            .opt_eq_id("created_by", filter.created_by)
            .search(&["code", "name"], filter.search.as_deref());
        fetch_page(pool, "playlists", COLUMNS, &f, page).await
    }

    /// Update name, description and, when given, the version list in one
    /// statement. `version_codes` must already be deduplicated and checked.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlaylist,
        version_codes: Option<&[String]>,
    ) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!(
            "UPDATE playlists SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                version_codes = COALESCE($5, version_codes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|d| d.as_deref()))
            .bind(version_codes)
            .fetch_optional(pool)
            .await
    }

    /// Replace the ordered version list.
    pub async fn set_version_codes(
        pool: &PgPool,
        id: DbId,
        version_codes: &[String],
    ) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!(
            "UPDATE playlists SET version_codes = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .bind(version_codes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
