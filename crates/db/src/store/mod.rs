//! The record store seam.
//!
//! Handlers hold an `Arc<dyn SuperheroStore>` so the same request code runs
//! against PostgreSQL in production and an in-memory store in tests.

use async_trait::async_trait;
use heroes_core::superhero::{NewSuperhero, Superhero, SuperheroChanges, SuperheroSummary};
use heroes_core::types::DbId;

mod memory;
mod postgres;

pub use memory::MemorySuperheroStore;
pub use postgres::PgSuperheroStore;

/// Errors raised by a [`SuperheroStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The nickname is already used by another record.
    #[error("Nickname already taken: {0}")]
    DuplicateNickname(String),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence contract for superhero records.
#[async_trait]
pub trait SuperheroStore: Send + Sync {
    /// Insert a record. Fails with [`StoreError::DuplicateNickname`] when
    /// the nickname is taken.
    async fn insert(&self, input: &NewSuperhero) -> Result<Superhero, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Superhero>, StoreError>;

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Superhero>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    /// List projections in insertion order, skipping `offset` records.
    async fn list_page(&self, offset: i64, limit: i64)
        -> Result<Vec<SuperheroSummary>, StoreError>;

    /// Apply a partial update. Returns `None` when the record does not exist.
    async fn update(
        &self,
        id: DbId,
        changes: &SuperheroChanges,
    ) -> Result<Option<Superhero>, StoreError>;

    /// Delete a record, returning it so its images can be cleaned up.
    async fn delete(&self, id: DbId) -> Result<Option<Superhero>, StoreError>;

    /// Whether the backing store is reachable.
    async fn ping(&self) -> bool;
}
