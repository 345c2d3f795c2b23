//! PostgreSQL persistence for the dailies tracker.
//!
//! - [`models`] -- `FromRow` entity structs and validated create/update DTOs.
//! - [`repositories`] -- zero-sized `*Repo` structs with async CRUD methods.
//! - [`filter`] -- dynamic `WHERE`/`ORDER BY`/pagination composition for lists.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod filter;
pub mod models;
pub mod patch;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
