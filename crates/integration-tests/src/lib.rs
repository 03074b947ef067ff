//! Integration tests for the Coast to Coast storefront.
//!
//! Tests drive the full axum router in-process with
//! `tower::ServiceExt::oneshot`, with the catalog document served by a
//! wiremock server and the cart backed by in-memory storage. No network
//! or filesystem setup is required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p coast-integration-tests
//! ```

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coast_storefront::cart::{CartStore, MemoryStorage};
use coast_storefront::catalog::CatalogClient;
use coast_storefront::config::StorefrontConfig;
use coast_storefront::state::AppState;

/// A storefront wired against a mock catalog server.
pub struct TestApp {
    router: Router,
    /// Held for the lifetime of the test; dropping it stops the mock server.
    catalog: MockServer,
}

impl TestApp {
    /// Spawn a storefront serving the given catalog document.
    pub async fn with_catalog(document: serde_json::Value) -> Self {
        let catalog = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/products.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(document))
            .mount(&catalog)
            .await;
        Self::wire(catalog)
    }

    /// Spawn a storefront whose catalog endpoint always returns a 500.
    pub async fn with_failing_catalog() -> Self {
        let catalog = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/products.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&catalog)
            .await;
        Self::wire(catalog)
    }

    fn wire(catalog: MockServer) -> Self {
        let catalog_url = format!("{}/data/products.json", catalog.uri());
        let config = StorefrontConfig::from_vars(|name| match name {
            "COAST_CATALOG_URL" => Some(catalog_url.clone()),
            _ => None,
        })
        .expect("test config should load");

        let client = CatalogClient::new(config.catalog_url.clone());
        let cart = CartStore::new(Arc::new(MemoryStorage::new()));
        let state = AppState::with_parts(config, client, cart);

        Self {
            router: coast_storefront::app(state),
            catalog,
        }
    }

    /// Base URL of the mock catalog server.
    #[must_use]
    pub fn catalog_uri(&self) -> String {
        self.catalog.uri()
    }

    /// Issue a GET request against the router.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond")
    }

    /// Issue a form-encoded POST request against the router.
    pub async fn post_form(&self, uri: &str, body: &str) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("request should build");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond")
    }
}

/// Read a response body to a string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

/// A small catalog exercising both deal types.
///
/// - `board` (£10.00): 10% off when three or more boards are in the basket
/// - `wax` (£4.00): any three for £10.00
/// - `fin` (£5.00): out of stock
/// - `tee` (£15.00): no promotions
#[must_use]
pub fn sample_catalog() -> serde_json::Value {
    json!({
        "categories": [
            {
                "id": "boards",
                "name": "Boards",
                "img": "/assets/images/boards.jpg",
                "description": "Boards for every break.",
                "products": [
                    {
                        "id": "board",
                        "name": "Longboard",
                        "price": 10.0,
                        "img": "/assets/images/board.jpg",
                        "description": "Nine feet of glide.",
                        "deals": ["bulk-boards"]
                    },
                    {
                        "id": "wax",
                        "name": "Surf Wax",
                        "price": 4.0,
                        "deals": ["wax-set"]
                    },
                    {
                        "id": "fin",
                        "name": "Single Fin",
                        "price": 5.0,
                        "inStock": false
                    }
                ]
            },
            {
                "id": "apparel",
                "name": "Apparel",
                "products": [
                    { "id": "tee", "name": "Logo Tee", "price": 15.0 }
                ]
            }
        ],
        "deals": [
            { "id": "bulk-boards", "type": "percentage", "requiredQty": 3, "percent": 10 },
            { "id": "wax-set", "type": "bySet", "requiredQty": 3, "setPrice": 10.0 }
        ]
    })
}
