//! Cart state and discount computation.
//!
//! The cart is a flat ordered list of `{id, qty}` line items persisted under
//! a single storage location. [`CartStore`] exclusively owns that state and
//! broadcasts a change event after every mutation; [`discount`] computes the
//! aggregate promotional discount for a set of line items against the
//! catalog's deal definitions.

pub mod discount;
pub mod storage;
mod store;

pub use storage::{CartStorage, FileStorage, MemoryStorage};
pub use store::{CartChanged, CartStore};

use coast_core::ProductId;
use serde::{Deserialize, Serialize};

/// A (product id, quantity) pair in the cart.
///
/// Invariants maintained by [`CartStore`]: at most one line item per product
/// id, and `qty >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub qty: u32,
}

impl LineItem {
    #[must_use]
    pub fn new(id: impl Into<ProductId>, qty: u32) -> Self {
        Self { id: id.into(), qty }
    }
}
