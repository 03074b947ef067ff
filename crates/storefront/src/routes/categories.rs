//! Category page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use coast_core::{CurrencyCode, Price};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{Category, Product};
use crate::filters;
use crate::state::AppState;

/// Query parameters for catalog entity pages.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// Product tile display data for the category panel.
#[derive(Clone)]
pub struct ProductTileView {
    pub href: String,
    pub name: String,
    pub image: String,
    pub in_stock: bool,
    pub price_label: String,
}

/// Category display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    pub products: Vec<ProductTileView>,
}

/// Format a decimal amount as a display price in the shop currency.
pub fn format_price(amount: Decimal) -> String {
    Price::new(amount, CurrencyCode::default()).display()
}

impl From<&Product> for ProductTileView {
    fn from(product: &Product) -> Self {
        Self {
            href: format!("/product?id={}", urlencoding::encode(product.id.as_str())),
            name: product.name.clone().unwrap_or_default(),
            image: product
                .image
                .clone()
                .unwrap_or_else(|| "/assets/images/insert_image.jpg".to_string()),
            in_stock: product.in_stock,
            price_label: format_price(product.price),
        }
    }
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            products: category.products.iter().map(ProductTileView::from).collect(),
        }
    }
}

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub category: Option<CategoryView>,
}

/// Display a category listing.
///
/// A missing or unknown `id` falls back to the first listed category; only
/// an empty catalog renders the not-found panel.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Query(query): Query<IdQuery>) -> impl IntoResponse {
    let index = state.catalog().load().await;

    let category = query
        .id
        .as_deref()
        .and_then(|id| index.category(id))
        .or_else(|| index.first_category());

    CategoryShowTemplate {
        category: category.map(CategoryView::from),
    }
}
