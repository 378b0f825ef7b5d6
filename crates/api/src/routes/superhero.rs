use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::superhero;
use crate::state::AppState;

/// Routes mounted under `/superheroes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(superhero::create))
        .route("/all", get(superhero::list))
        .route("/{id}", get(superhero::get_by_id))
        .route("/update/{id}", put(superhero::update))
        .route("/delete/{id}", delete(superhero::delete))
}
