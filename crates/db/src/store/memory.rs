use async_trait::async_trait;
use heroes_core::superhero::{NewSuperhero, Superhero, SuperheroChanges, SuperheroSummary};
use heroes_core::types::DbId;
use tokio::sync::RwLock;

use super::{StoreError, SuperheroStore};

/// [`SuperheroStore`] held in process memory.
///
/// Keeps the same guarantees as the PostgreSQL store: ids increase from 1,
/// records list in insertion order and nicknames are unique.
#[derive(Default)]
pub struct MemorySuperheroStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: DbId,
    rows: Vec<Superhero>,
}

impl MemorySuperheroStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records with the given nickname. Used by tests to check
    /// the uniqueness invariant directly.
    pub async fn nickname_count(&self, nickname: &str) -> usize {
        let inner = self.inner.read().await;
        inner.rows.iter().filter(|h| h.nickname == nickname).count()
    }
}

#[async_trait]
impl SuperheroStore for MemorySuperheroStore {
    async fn insert(&self, input: &NewSuperhero) -> Result<Superhero, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.rows.iter().any(|h| h.nickname == input.nickname) {
            return Err(StoreError::DuplicateNickname(input.nickname.clone()));
        }

        inner.last_id += 1;
        let now = chrono::Utc::now();
        let hero = Superhero {
            id: inner.last_id,
            nickname: input.nickname.clone(),
            real_name: input.real_name.clone(),
            origin_description: input.origin_description.clone(),
            superpowers: input.superpowers.clone(),
            catch_phrase: input.catch_phrase.clone(),
            images: input.images.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(hero.clone());
        Ok(hero)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Superhero>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.iter().find(|h| h.id == id).cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Superhero>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.iter().find(|h| h.nickname == nickname).cloned())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.read().await.rows.len() as i64)
    }

    async fn list_page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SuperheroSummary>, StoreError> {
        let inner = self.inner.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(inner
            .rows
            .iter()
            .skip(offset)
            .take(limit)
            .map(Superhero::summary)
            .collect())
    }

    async fn update(
        &self,
        id: DbId,
        changes: &SuperheroChanges,
    ) -> Result<Option<Superhero>, StoreError> {
        let mut inner = self.inner.write().await;

        if let Some(nickname) = &changes.nickname {
            if inner
                .rows
                .iter()
                .any(|h| h.id != id && &h.nickname == nickname)
            {
                return Err(StoreError::DuplicateNickname(nickname.clone()));
            }
        }

        let Some(hero) = inner.rows.iter_mut().find(|h| h.id == id) else {
            return Ok(None);
        };
        changes.apply_to(hero);
        hero.updated_at = chrono::Utc::now();
        Ok(Some(hero.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<Option<Superhero>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(pos) = inner.rows.iter().position(|h| h.id == id) else {
            return Ok(None);
        };
        Ok(Some(inner.rows.remove(pos)))
    }

    async fn ping(&self) -> bool {
        true
    }
}
