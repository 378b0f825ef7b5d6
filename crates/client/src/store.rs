use std::sync::Arc;

use heroes_core::superhero::{Superhero, SuperheroPage};
use heroes_core::types::DbId;
use tokio::sync::RwLock;

use crate::api::{CatalogApi, SuperheroInput};
use crate::error::ClientError;
use crate::state::{reduce, Action, Operation, Phase, SuperheroState};

/// Owns the catalog state and runs requests against a [`CatalogApi`].
///
/// Each action dispatches `Pending`, awaits the API, then dispatches the
/// outcome. Concurrent actions are not deduplicated; whichever response
/// arrives last wins.
pub struct CatalogStore {
    api: Arc<dyn CatalogApi>,
    state: RwLock<SuperheroState>,
}

impl CatalogStore {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self::with_state(api, SuperheroState::default())
    }

    pub fn with_state(api: Arc<dyn CatalogApi>, state: SuperheroState) -> Self {
        Self {
            api,
            state: RwLock::new(state),
        }
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> SuperheroState {
        self.state.read().await.clone()
    }

    pub async fn dispatch(&self, action: Action) {
        let mut state = self.state.write().await;
        *state = reduce(std::mem::take(&mut *state), action);
    }

    pub async fn create_superhero(&self, input: &SuperheroInput) -> Result<Superhero, ClientError> {
        self.dispatch(Action::Create(Phase::Pending)).await;
        let result = self.api.create(input).await;
        self.settle(Operation::Create, &result, Action::Create).await;
        result
    }

    /// Load a page; `page_url` is a `nextPageUrl`/`prevPageUrl` link or
    /// `None` for the first page.
    pub async fn get_all_superheroes(
        &self,
        page_url: Option<&str>,
    ) -> Result<SuperheroPage, ClientError> {
        self.dispatch(Action::List(Phase::Pending)).await;
        let result = self.api.list(page_url).await;
        self.settle(Operation::List, &result, Action::List).await;
        result
    }

    pub async fn get_superhero(&self, id: DbId) -> Result<Superhero, ClientError> {
        self.dispatch(Action::Get(Phase::Pending)).await;
        let result = self.api.get(id).await;
        self.settle(Operation::Get, &result, Action::Get).await;
        result
    }

    pub async fn update_superhero(
        &self,
        id: DbId,
        input: &SuperheroInput,
    ) -> Result<Superhero, ClientError> {
        self.dispatch(Action::Update(Phase::Pending)).await;
        let result = self.api.update(id, input).await;
        self.settle(Operation::Update, &result, Action::Update).await;
        result
    }

    pub async fn delete_superhero(&self, id: DbId) -> Result<DbId, ClientError> {
        self.dispatch(Action::Delete(Phase::Pending)).await;
        let result = self.api.delete(id).await;
        self.settle(Operation::Delete, &result, Action::Delete).await;
        result
    }

    pub async fn set_superhero_to_edit(&self, superhero: Option<Superhero>) {
        self.dispatch(Action::SetSuperheroToEdit(superhero)).await;
    }

    async fn settle<T: Clone>(
        &self,
        operation: Operation,
        result: &Result<T, ClientError>,
        action: impl FnOnce(Phase<T>) -> Action,
    ) {
        let phase = match result {
            Ok(value) => Phase::Fulfilled(value.clone()),
            Err(err) => {
                tracing::warn!(?operation, error = %err, "Catalog request failed");
                Phase::Rejected(operation.error_message(err))
            }
        };
        self.dispatch(action(phase)).await;
    }
}
