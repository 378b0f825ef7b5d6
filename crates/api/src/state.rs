use std::sync::Arc;

use heroes_core::uploads::UploadDir;
use heroes_db::SuperheroStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (the store is behind an `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Record store (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn SuperheroStore>,
    /// Directory uploaded images are written to and served from.
    pub uploads: UploadDir,
}
