//! Catalog loading and indexing.
//!
//! The whole catalog lives in one JSON document fetched by URL. Every page
//! view fetches it fresh - the document is small, the fetch is an idempotent
//! read, and skipping a cache keeps renders eventually consistent with the
//! latest published catalog. On any fetch or parse failure the loader logs a
//! diagnostic and hands back empty indices; callers treat that as "no pricing
//! information available", never as a fatal condition.

mod document;

pub use document::{CatalogDocument, RawCategory, RawDeal, RawDeals, RawProduct};

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use coast_core::{CategoryId, DealId, ProductId};

/// Errors from a single catalog fetch. Internal to the loader; `load()`
/// degrades them all to an empty index.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("catalog request returned HTTP {0}")]
    Status(u16),
}

/// A category with its resolved products.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub products: Vec<Product>,
}

/// Category fields a product carries after denormalization, for image and
/// description fallbacks on the product page.
#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// A product denormalized with its parent category.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: Option<String>,
    /// Unit price; zero when the document carried none.
    pub price: Decimal,
    pub image: Option<String>,
    pub in_stock: bool,
    pub description: Option<String>,
    /// Deals this product participates in. A product may belong to several.
    pub deal_ids: Vec<DealId>,
    pub category: CategorySummary,
}

impl Product {
    /// Whether this product participates in the given deal (string-compared).
    #[must_use]
    pub fn in_deal(&self, deal_id: &DealId) -> bool {
        self.deal_ids.contains(deal_id)
    }
}

/// A promotion rule from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub id: DealId,
    pub kind: DealKind,
    /// Qualifying-quantity threshold. `None` (absent, zero or non-numeric)
    /// makes the deal inert.
    pub required_qty: Option<Decimal>,
}

/// Type-specific deal pricing parameters.
///
/// The inner amounts are `None` when the document carried a non-numeric
/// value; the discount engine contributes nothing for those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealKind {
    /// Percent off the qualifying lines' original total.
    Percentage { percent: Option<Decimal> },
    /// Fixed price per `required_qty` units, remainder at the average
    /// original unit rate.
    BySet { set_price: Option<Decimal> },
    /// Unrecognized type; never contributes a discount.
    Other,
}

/// Lookup maps built from one fetched catalog document.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    categories: Vec<Category>,
    products: HashMap<String, Product>,
    deals: Vec<Deal>,
}

impl CatalogIndex {
    /// Build the index from a parsed document.
    ///
    /// Products are keyed by their stringified id; a duplicate id keeps the
    /// last occurrence. Deals keep the document's listing order.
    #[must_use]
    pub fn from_document(doc: &CatalogDocument) -> Self {
        let categories: Vec<Category> =
            doc.categories.iter().filter_map(RawCategory::resolve).collect();

        let mut products = HashMap::new();
        for category in &categories {
            for product in &category.products {
                products.insert(product.id.as_str().to_owned(), product.clone());
            }
        }

        Self {
            categories,
            products,
            deals: doc.deals.resolve(),
        }
    }

    /// All categories in listing order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The first listed category, used as the fallback when a category page
    /// is opened without an id.
    #[must_use]
    pub fn first_category(&self) -> Option<&Category> {
        self.categories.first()
    }

    /// Look up a category by id.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == *id)
    }

    /// Look up a product by id (denormalized with its parent category).
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    /// All deals in listing order.
    #[must_use]
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Look up a deal by id.
    #[must_use]
    pub fn deal(&self, id: &str) -> Option<&Deal> {
        self.deals.iter().find(|d| d.id == *id)
    }

    /// True when the index holds no catalog data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.deals.is_empty()
    }
}

/// Client for the catalog document endpoint.
///
/// Fetches are uncached and undeduplicated: overlapping renders each fetch
/// independently. No retries, no timeouts beyond reqwest's defaults.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    url: String,
}

impl CatalogClient {
    /// Create a new catalog client for the given document URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetch and index the catalog document.
    ///
    /// Never fails: transport errors, non-2xx statuses and unparseable
    /// bodies all degrade to an empty index with a logged warning.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn load(&self) -> CatalogIndex {
        match self.fetch().await {
            Ok(doc) => CatalogIndex::from_document(&doc),
            Err(e) => {
                tracing::warn!(error = %e, "catalog load failed, serving empty indices");
                CatalogIndex::default()
            }
        }
    }

    async fn fetch(&self) -> Result<CatalogDocument, CatalogError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.json::<CatalogDocument>().await?)
    }
}
