//! Persistence for superhero records.
//!
//! [`store::SuperheroStore`] is the seam the API depends on. It has two
//! implementations: [`store::PgSuperheroStore`] over PostgreSQL (queries
//! live in [`repositories::SuperheroRepo`]) and
//! [`store::MemorySuperheroStore`] for tests and database-less runs.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::{MemorySuperheroStore, PgSuperheroStore, StoreError, SuperheroStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
