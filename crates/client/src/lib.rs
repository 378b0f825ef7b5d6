//! Client side of the superhero catalog.
//!
//! - [`api`]: the [`api::CatalogApi`] seam and its HTTP implementation.
//! - [`state`]: catalog state and the pure reducer over async action phases.
//! - [`store`]: [`store::CatalogStore`], which runs actions against an API.
//! - [`view`]: view models for the list, detail modal and form.

pub mod api;
pub mod error;
pub mod state;
pub mod store;
pub mod view;
