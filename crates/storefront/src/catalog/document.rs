//! Raw catalog document parsing.
//!
//! The catalog JSON is hand-authored and loosely schemad: several fields go
//! by more than one name (`requiredQty`/`requiredQuantity`/`qty`), `deals`
//! may be an array or an object keyed by id, ids may be numbers, and prices
//! may be missing or garbage. The raw types here keep every alias as an
//! untyped [`serde_json::Value`] and resolve them with the same
//! first-truthy-alias priority the document's existing consumers use, so a
//! document that renders today keeps rendering here.
//!
//! Alias priority (normative, first truthy wins):
//! - required quantity: `requiredQty` > `requiredQuantity` > `qty`
//! - percent off: `percent` > `percentOff`
//! - set price: `setPrice` > `set_total`
//! - product deal membership: `deals` > `deal` > `dealIds`
//! - product image: `img` > `image`

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use coast_core::{CategoryId, DealId, ProductId};

use super::{Category, CategorySummary, Deal, DealKind, Product};

/// Top-level catalog document.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub categories: Vec<RawCategory>,
    #[serde(default)]
    pub deals: RawDeals,
}

/// A category as it appears in the document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCategory {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub img: Option<Value>,
    pub description: Option<Value>,
    pub products: Vec<RawProduct>,
}

/// A product as it appears in the document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawProduct {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub price: Option<Value>,
    pub img: Option<Value>,
    pub image: Option<Value>,
    #[serde(rename = "inStock")]
    pub in_stock: Option<Value>,
    pub description: Option<Value>,
    pub deals: Option<Value>,
    pub deal: Option<Value>,
    #[serde(rename = "dealIds")]
    pub deal_ids: Option<Value>,
}

/// A deal as it appears in the document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RawDeal {
    pub id: Option<Value>,
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    #[serde(rename = "requiredQty")]
    pub required_qty: Option<Value>,
    #[serde(rename = "requiredQuantity")]
    pub required_quantity: Option<Value>,
    pub qty: Option<Value>,
    pub percent: Option<Value>,
    #[serde(rename = "percentOff")]
    pub percent_off: Option<Value>,
    #[serde(rename = "setPrice")]
    pub set_price: Option<Value>,
    pub set_total: Option<Value>,
}

/// The `deals` section accepts both an array of deals (ids inline) and an
/// object keyed by deal id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawDeals {
    List(Vec<RawDeal>),
    Map(HashMap<String, RawDeal>),
}

impl Default for RawDeals {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

// =============================================================================
// Lenient value helpers
// =============================================================================

/// Truthiness as the document's existing consumers evaluate it: null, false,
/// zero, NaN and the empty string are falsy; arrays and objects (even empty
/// ones) are truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First truthy value among the candidates, in priority order.
fn first_truthy<'a>(candidates: &[&'a Option<Value>]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|c| c.as_ref())
        .find(|v| is_truthy(v))
}

/// Scalar-to-string coercion for identifiers. Arrays and objects have no
/// usable string form and yield `None`.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Lenient numeric coercion. Numbers pass through, numeric strings parse,
/// `true`/`false` become 1/0; anything else is `None` (the NaN case).
fn number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
        }
        Value::Bool(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deal-membership coercion: an array yields its scalar elements stringified,
/// a scalar yields a single-element list.
fn id_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_string).collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}

// =============================================================================
// Resolution into domain types
// =============================================================================

impl RawCategory {
    fn summary(&self) -> Option<CategorySummary> {
        let id = self.id.as_ref().and_then(scalar_string)?;
        Some(CategorySummary {
            id: CategoryId::new(id),
            name: self.name.as_ref().and_then(scalar_string).unwrap_or_default(),
            image: self.img.as_ref().and_then(scalar_string),
            description: self.description.as_ref().and_then(scalar_string),
        })
    }

    /// Resolve into a domain category, or `None` when the entry has no usable
    /// id. Products without a usable id are dropped the same way.
    pub fn resolve(&self) -> Option<Category> {
        let summary = self.summary()?;
        let products = self
            .products
            .iter()
            .filter_map(|p| p.resolve(&summary))
            .collect();
        Some(Category {
            id: summary.id.clone(),
            name: summary.name.clone(),
            image: summary.image.clone(),
            description: summary.description.clone(),
            products,
        })
    }
}

impl RawProduct {
    fn resolve(&self, category: &CategorySummary) -> Option<Product> {
        let id = self.id.as_ref().and_then(scalar_string)?;

        // Absent or non-numeric prices are worth zero, never an error.
        let price = self
            .price
            .as_ref()
            .and_then(number)
            .unwrap_or(Decimal::ZERO);

        let deal_ids = first_truthy(&[&self.deals, &self.deal, &self.deal_ids])
            .map(id_list)
            .unwrap_or_default()
            .into_iter()
            .map(DealId::new)
            .collect();

        Some(Product {
            id: ProductId::new(id),
            name: self.name.as_ref().and_then(scalar_string),
            price,
            image: first_truthy(&[&self.img, &self.image]).and_then(scalar_string),
            // Only a literal `false` marks a product out of stock.
            in_stock: self.in_stock != Some(Value::Bool(false)),
            description: self.description.as_ref().and_then(scalar_string),
            deal_ids,
            category: category.clone(),
        })
    }
}

impl RawDeal {
    /// Resolve into a domain deal under the given id (the inline `id` for the
    /// array form, the object key for the map form).
    pub fn resolve(&self, id: String) -> Deal {
        let required_qty = first_truthy(&[&self.required_qty, &self.required_quantity, &self.qty])
            .and_then(number)
            .filter(|r| r.is_sign_positive() && !r.is_zero());

        let kind = match self.kind.as_ref().and_then(scalar_string).as_deref() {
            Some("percentage") => DealKind::Percentage {
                percent: first_truthy(&[&self.percent, &self.percent_off])
                    .map_or(Some(Decimal::ZERO), number),
            },
            Some("bySet") => DealKind::BySet {
                set_price: first_truthy(&[&self.set_price, &self.set_total])
                    .map_or(Some(Decimal::ZERO), number),
            },
            _ => DealKind::Other,
        };

        Deal {
            id: DealId::new(id),
            kind,
            required_qty,
        }
    }
}

impl RawDeals {
    /// Resolve into domain deals in listing order (object form carries no
    /// reliable order; evaluation is order-insensitive anyway since deals
    /// contribute independently).
    pub fn resolve(&self) -> Vec<Deal> {
        match self {
            Self::List(list) => list
                .iter()
                .filter_map(|d| {
                    let id = d.id.as_ref().filter(|v| is_truthy(v))?;
                    Some(d.resolve(scalar_string(id)?))
                })
                .collect(),
            Self::Map(map) => map
                .iter()
                .map(|(id, d)| d.resolve(id.clone()))
                .collect(),
        }
    }
}
