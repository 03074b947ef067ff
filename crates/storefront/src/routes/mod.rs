//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /              - Home page (hero carousel + category grid)
//! GET  /health        - Health check
//!
//! # Catalog
//! GET  /category?id=  - Category listing (falls back to the first category)
//! GET  /product?id=   - Product detail (explicit not-found state)
//!
//! # Cart (HTMX fragments)
//! GET  /cart          - Cart page
//! POST /cart/add      - Add to cart (returns count fragment, triggers cart-updated)
//! POST /cart/update   - Update quantity (returns cart_items fragment)
//! POST /cart/remove   - Remove item (returns cart_items fragment)
//! POST /cart/clear    - Empty the cart (returns cart_items fragment)
//! GET  /cart/count    - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout      - Stub page (checkout is not implemented)
//! ```

pub mod cart;
pub mod categories;
pub mod home;
pub mod products;

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Health check
        .route("/health", get(health))
        // Catalog pages
        .route("/category", get(categories::show))
        .route("/product", get(products::show))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout stub
        .route("/checkout", get(cart::checkout))
}

/// Health check endpoint.
async fn health() -> &'static str {
    "OK"
}

/// Fallback handler for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_owned())
}
