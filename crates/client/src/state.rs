//! Catalog state and its reducer.
//!
//! Every async action goes through three phases: [`Phase::Pending`] when
//! the request starts, then [`Phase::Fulfilled`] or [`Phase::Rejected`].
//! [`reduce`] is pure; [`crate::store::CatalogStore`] owns the state and
//! feeds it actions.

use heroes_core::superhero::{Superhero, SuperheroPage, SuperheroSummary};
use heroes_core::types::DbId;

use crate::error::ClientError;

/// Everything the views render from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuperheroState {
    /// Record shown in the detail modal.
    pub current_superhero: Option<Superhero>,
    pub superheroes_list: Vec<SuperheroSummary>,
    /// A request is in flight.
    pub loading: bool,
    /// Message of the last failed request, cleared when the next one starts.
    pub error: Option<String>,
    pub total_pages: Option<i64>,
    pub current_page: Option<i64>,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
    /// Record opened in the edit form.
    pub superhero_to_edit: Option<Superhero>,
}

/// The catalog requests the client can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Get,
    Update,
    Delete,
}

impl Operation {
    /// Shown when the server rejects the request without a message.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Create => "failed to create superhero",
            Operation::List => "failed to fetch superheroes",
            Operation::Get => "failed to fetch superhero",
            Operation::Update => "failed to update superhero",
            Operation::Delete => "failed to delete superhero",
        }
    }

    /// Shown when the request itself failed.
    pub fn network_message(self) -> &'static str {
        match self {
            Operation::Create => "Network error during superhero creation",
            Operation::List => "Network error during fetching superheroes",
            Operation::Get => "Network error during fetching superhero",
            Operation::Update => "Network error during superhero update",
            Operation::Delete => "Network error during superhero deletion",
        }
    }

    /// The message surfaced in [`SuperheroState::error`] for a failure.
    pub fn error_message(self, err: &ClientError) -> String {
        match err {
            ClientError::Server {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            ClientError::Server { .. } | ClientError::Encode(_) => {
                self.failure_message().to_string()
            }
            ClientError::Network(_) => self.network_message().to_string(),
        }
    }
}

/// Lifecycle of one async action.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Create(Phase<Superhero>),
    List(Phase<SuperheroPage>),
    Get(Phase<Superhero>),
    Update(Phase<Superhero>),
    Delete(Phase<DbId>),
    SetSuperheroToEdit(Option<Superhero>),
}

/// Compute the state that follows `action`.
pub fn reduce(mut state: SuperheroState, action: Action) -> SuperheroState {
    match action {
        Action::SetSuperheroToEdit(hero) => {
            state.superhero_to_edit = hero;
            return state;
        }

        Action::Create(phase) => settle(&mut state, phase, |state, hero| {
            state.superheroes_list.insert(0, hero.summary());
        }),

        Action::List(phase) => settle(&mut state, phase, |state, page| {
            state.superheroes_list = page.superheroes;
            state.total_pages = Some(page.total_pages);
            state.current_page = Some(page.current_page);
            state.next_page_url = page.next_page_url;
            state.prev_page_url = page.prev_page_url;
        }),

        Action::Get(phase) => {
            // The detail modal only ever shows the record it asked for.
            if matches!(phase, Phase::Pending) {
                state.current_superhero = None;
            }
            settle(&mut state, phase, |state, hero| {
                state.current_superhero = Some(hero);
            })
        }

        Action::Update(phase) => settle(&mut state, phase, |state, hero| {
            if let Some(entry) = state
                .superheroes_list
                .iter_mut()
                .find(|entry| entry.id == hero.id)
            {
                *entry = hero.summary();
            }
            if state
                .current_superhero
                .as_ref()
                .is_some_and(|current| current.id == hero.id)
            {
                state.current_superhero = Some(hero);
            }
        }),

        Action::Delete(phase) => settle(&mut state, phase, |state, id| {
            state.superheroes_list.retain(|entry| entry.id != id);
            if state
                .current_superhero
                .as_ref()
                .is_some_and(|current| current.id == id)
            {
                state.current_superhero = None;
            }
        }),
    }
    state
}

/// Apply the loading/error bookkeeping shared by every action, and run
/// `fulfil` with the result on success.
fn settle<T>(
    state: &mut SuperheroState,
    phase: Phase<T>,
    fulfil: impl FnOnce(&mut SuperheroState, T),
) {
    match phase {
        Phase::Pending => {
            state.loading = true;
            state.error = None;
        }
        Phase::Fulfilled(value) => {
            state.loading = false;
            state.error = None;
            fulfil(state, value);
        }
        Phase::Rejected(message) => {
            state.loading = false;
            state.error = Some(message);
        }
    }
}
