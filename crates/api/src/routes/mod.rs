pub mod health;
pub mod superhero;

use axum::Router;

use crate::state::AppState;

/// Build the catalog route tree.
///
/// ```text
/// /superheroes
///     POST   /create          create (multipart)
///     GET    /all             list (?page=&limit=)
///     GET    /{id}            get_by_id
///     PUT    /update/{id}     update (multipart)
///     DELETE /delete/{id}     delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/superheroes", superhero::router())
}
