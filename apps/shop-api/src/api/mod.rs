//! API routes module

pub mod brands;
pub mod categories;
pub mod health;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// API routes without the `/api` prefix; `create_router` adds it.
///
/// Every sub-router already carries its state.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/brands", brands::router(state))
        .nest("/categories", categories::router(state))
        .nest("/products", products::router(state))
}

/// `/ready`, probing the database.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
