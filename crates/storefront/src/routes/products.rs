//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::catalog::Product;
use crate::filters;
use crate::state::AppState;

use super::categories::{IdQuery, format_price};

/// Product display data for the detail page.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price_label: String,
    pub image: String,
    pub description: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product
                .name
                .clone()
                .unwrap_or_else(|| "Unnamed product".to_string()),
            price_label: format_price(product.price),
            // product image, else the parent category's, else the placeholder
            image: product
                .image
                .clone()
                .or_else(|| product.category.image.clone())
                .unwrap_or_else(|| "/assets/images/insert_image.jpg".to_string()),
            description: product
                .description
                .clone()
                .or_else(|| product.category.description.clone())
                .unwrap_or_else(|| "No description available.".to_string()),
            in_stock: product.in_stock,
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    /// `None` renders the explicit not-found state.
    pub product: Option<ProductView>,
}

/// Display a product detail page.
///
/// A missing or unknown `id` renders the not-found state rather than an
/// error; the page always renders.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Query(query): Query<IdQuery>) -> impl IntoResponse {
    let product = match query.id.as_deref() {
        Some(id) => {
            let index = state.catalog().load().await;
            index.product(id).map(ProductView::from)
        }
        // No id at all: skip the fetch, same not-found state.
        None => None,
    };

    ProductShowTemplate { product }
}
