//! HTTP route handlers.

pub mod category;
pub mod convention;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the application router with all routes and state applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(category::router())
        .merge(convention::router())
        .with_state(state)
}
