use async_trait::async_trait;
use heroes_core::superhero::{NewSuperhero, Superhero, SuperheroChanges, SuperheroSummary};
use heroes_core::types::DbId;

use super::{StoreError, SuperheroStore};
use crate::repositories::superhero_repo::NICKNAME_CONSTRAINT;
use crate::repositories::SuperheroRepo;
use crate::DbPool;

/// [`SuperheroStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgSuperheroStore {
    pool: DbPool,
}

impl PgSuperheroStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Turn a unique violation on the nickname constraint into
/// [`StoreError::DuplicateNickname`]; pass everything else through.
fn classify(err: sqlx::Error, nickname: Option<&str>) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(NICKNAME_CONSTRAINT)
        {
            return StoreError::DuplicateNickname(nickname.unwrap_or_default().to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl SuperheroStore for PgSuperheroStore {
    async fn insert(&self, input: &NewSuperhero) -> Result<Superhero, StoreError> {
        let row = SuperheroRepo::create(&self.pool, input)
            .await
            .map_err(|e| classify(e, Some(&input.nickname)))?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Superhero>, StoreError> {
        Ok(SuperheroRepo::find_by_id(&self.pool, id).await?.map(Into::into))
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Superhero>, StoreError> {
        Ok(SuperheroRepo::find_by_nickname(&self.pool, nickname)
            .await?
            .map(Into::into))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(SuperheroRepo::count(&self.pool).await?)
    }

    async fn list_page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SuperheroSummary>, StoreError> {
        let rows = SuperheroRepo::list_page(&self.pool, offset, limit).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: DbId,
        changes: &SuperheroChanges,
    ) -> Result<Option<Superhero>, StoreError> {
        let row = SuperheroRepo::update(&self.pool, id, changes)
            .await
            .map_err(|e| classify(e, changes.nickname.as_deref()))?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: DbId) -> Result<Option<Superhero>, StoreError> {
        Ok(SuperheroRepo::delete(&self.pool, id).await?.map(Into::into))
    }

    async fn ping(&self) -> bool {
        match crate::health_check(&self.pool).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        }
    }
}
