//! Coast to Coast Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router with middleware and state applied.
///
/// Used by both `main` and the integration tests.
pub fn app(state: AppState) -> Router {
    let assets_dir = state.config().assets_dir.clone();
    routes::routes()
        .nest_service("/assets", ServeDir::new(assets_dir))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
