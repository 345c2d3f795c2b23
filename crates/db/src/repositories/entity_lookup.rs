//! Cross-table lookups keyed by [`EntityType`].
//!
//! Versions point at their target by (`entity_type`, `entity_code`) and notes
//! by (`entity_type`, `entity_id`); neither has a foreign key. These helpers
//! resolve such a reference to the owning project, and manage thumbnail
//! paths uniformly. Table names come from [`EntityType::table`] only.

use dailies_core::codes::EntityType;
use dailies_core::types::DbId;
use sqlx::PgPool;

pub struct EntityLookup;

impl EntityLookup {
    /// Column holding the owning project's id on `entity_type`'s table.
    fn project_column(entity_type: EntityType) -> &'static str {
        match entity_type {
            EntityType::Project => "id",
            _ => "project_id",
        }
    }

    /// Project that owns the entity with `code`, `None` if there is none.
    pub async fn project_id_for_code(
        pool: &PgPool,
        entity_type: EntityType,
        code: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE code = $1",
            Self::project_column(entity_type),
            entity_type.table()
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Project that owns the entity with `id`, `None` if there is none.
    pub async fn project_id_for_id(
        pool: &PgPool,
        entity_type: EntityType,
        id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            Self::project_column(entity_type),
            entity_type.table()
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Code of the entity with `id`, used to name its thumbnail.
    pub async fn code_for_id(
        pool: &PgPool,
        entity_type: EntityType,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let query = format!("SELECT code FROM {} WHERE id = $1", entity_type.table());
        sqlx::query_scalar::<_, String>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Currently stored thumbnail path of the entity with `id`.
    pub async fn thumbnail_path_for_id(
        pool: &PgPool,
        entity_type: EntityType,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        if entity_type == EntityType::Playlist {
            return Ok(None);
        }
        let query = format!(
            "SELECT thumbnail_path FROM {} WHERE id = $1",
            entity_type.table()
        );
        let row = sqlx::query_scalar::<_, Option<String>>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.flatten())
    }

    /// Store a thumbnail's `bucket/key` path. Returns `false` when no row
    /// with `id` exists. Playlists have no thumbnail column.
    pub async fn set_thumbnail_path(
        pool: &PgPool,
        entity_type: EntityType,
        id: DbId,
        path: &str,
    ) -> Result<bool, sqlx::Error> {
        if entity_type == EntityType::Playlist {
            return Ok(false);
        }
        let query = format!(
            "UPDATE {} SET thumbnail_path = $2 WHERE id = $1",
            entity_type.table()
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(path)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
