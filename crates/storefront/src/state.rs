//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::{CartStore, FileStorage};
use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the catalog client and the cart store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cart: CartStore,
}

impl AppState {
    /// Create the production application state: catalog client pointed at
    /// the configured URL, cart persisted to the configured file.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(config.catalog_url.clone());
        let cart = CartStore::new(Arc::new(FileStorage::new(config.cart_path.clone())));
        Self::with_parts(config, catalog, cart)
    }

    /// Create state from explicit parts. Used by tests to inject an
    /// in-memory cart backend or a mock catalog endpoint.
    #[must_use]
    pub fn with_parts(config: StorefrontConfig, catalog: CatalogClient, cart: CartStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
