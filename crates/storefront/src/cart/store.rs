//! The cart store: persisted line items plus change notification.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use tracing::warn;

use super::storage::CartStorage;
use super::LineItem;

/// Broadcast payload published after every cart mutation.
///
/// The snapshot is advisory: by the time a subscriber runs, later mutations
/// may have landed. Subscribers must re-read [`CartStore::list`] rather than
/// render from the payload.
#[derive(Debug, Clone)]
pub struct CartChanged {
    pub items: Vec<LineItem>,
}

/// Owner of the persisted cart state.
///
/// All reads and writes of the persisted line-item list go through this
/// store; mutations are serialized by an internal mutex, persist through the
/// injected [`CartStorage`] backend, and publish a [`CartChanged`] event.
///
/// Cheaply cloneable; clones share state and the change channel.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn CartStorage>,
    /// Serializes read-modify-write cycles across clones.
    lock: Mutex<()>,
    changes: broadcast::Sender<CartChanged>,
}

impl CartStore {
    /// Create a store over the given storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                lock: Mutex::new(()),
                changes,
            }),
        }
    }

    /// Subscribe to cart-changed events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.inner.changes.subscribe()
    }

    /// Add a product to the cart, merging into an existing line item.
    ///
    /// `qty` is coerced to an integer >= 1; `None` (absent or unparseable
    /// input) defaults to 1. Returns the resulting list.
    pub fn add(&self, product_id: &str, qty: Option<i64>) -> Vec<LineItem> {
        let qty = clamp_qty(qty.unwrap_or(1));

        let _guard = self.guard();
        let mut items = self.read_items();
        if let Some(existing) = items.iter_mut().find(|i| i.id == *product_id) {
            existing.qty = existing.qty.saturating_add(qty);
        } else {
            items.push(LineItem::new(product_id, qty));
        }
        self.persist(&items);
        self.notify(&items);
        items
    }

    /// Set a line item's quantity.
    ///
    /// A quantity <= 0 removes the line item; anything else is clamped to a
    /// minimum of 1. Updating a product that is not in the cart returns the
    /// list unchanged (no error, no new entry, no notification).
    pub fn update(&self, product_id: &str, qty: i64) -> Vec<LineItem> {
        let _guard = self.guard();
        let mut items = self.read_items();
        let Some(pos) = items.iter().position(|i| i.id == *product_id) else {
            return items;
        };

        if qty <= 0 {
            items.remove(pos);
        } else if let Some(item) = items.get_mut(pos) {
            item.qty = clamp_qty(qty);
        }
        self.persist(&items);
        self.notify(&items);
        items
    }

    /// Remove a line item by product id (string-compared).
    pub fn remove(&self, product_id: &str) -> Vec<LineItem> {
        let _guard = self.guard();
        let mut items = self.read_items();
        items.retain(|i| i.id != *product_id);
        self.persist(&items);
        self.notify(&items);
        items
    }

    /// Empty the cart.
    pub fn clear(&self) {
        let _guard = self.guard();
        let items = Vec::new();
        self.persist(&items);
        self.notify(&items);
    }

    /// Current persisted line items. Missing or malformed persisted data
    /// reads back as an empty cart.
    #[must_use]
    pub fn list(&self) -> Vec<LineItem> {
        let _guard = self.guard();
        self.read_items()
    }

    /// Sum of all line items' quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.list().iter().map(|i| u64::from(i.qty)).sum()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.inner.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_items(&self) -> Vec<LineItem> {
        self.inner
            .storage
            .load()
            .and_then(|payload| serde_json::from_str(&payload).ok())
            .unwrap_or_default()
    }

    fn persist(&self, items: &[LineItem]) {
        match serde_json::to_string(items) {
            Ok(payload) => {
                if let Err(e) = self.inner.storage.save(&payload) {
                    warn!(error = %e, "failed to persist cart");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize cart"),
        }
    }

    fn notify(&self, items: &[LineItem]) {
        // No receivers is fine; the event is fire-and-forget.
        let _ = self.inner.changes.send(CartChanged {
            items: items.to_vec(),
        });
    }
}

/// Coerce a requested quantity to the invariant range (integer >= 1).
fn clamp_qty(qty: i64) -> u32 {
    u32::try_from(qty.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::super::storage::MemoryStorage;
    use super::*;

    fn store() -> CartStore {
        CartStore::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_add_merges_existing_line() {
        let cart = store();
        cart.add("p1", Some(2));
        let items = cart.add("p1", Some(3));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].qty, 5);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_add_clamps_quantity() {
        let cart = store();
        assert_eq!(cart.add("p1", Some(0))[0].qty, 1);

        let cart = store();
        assert_eq!(cart.add("p1", Some(-4))[0].qty, 1);

        let cart = store();
        assert_eq!(cart.add("p1", None)[0].qty, 1);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let cart = store();
        cart.add("p1", None);
        cart.add("p2", Some(2));
        let items = cart.add("p1", None);

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_update_sets_and_clamps() {
        let cart = store();
        cart.add("p1", Some(2));

        let items = cart.update("p1", 7);
        assert_eq!(items[0].qty, 7);
    }

    #[test]
    fn test_update_nonpositive_removes_line() {
        let cart = store();
        cart.add("p1", Some(2));
        cart.add("p2", Some(1));

        let items = cart.update("p1", 0);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_str(), "p2");

        let items = cart.update("p2", -3);
        assert!(items.is_empty());
    }

    #[test]
    fn test_update_unknown_product_is_a_no_op() {
        let cart = store();
        cart.add("p1", Some(2));

        let items = cart.update("ghost", 5);
        assert_eq!(items, vec![LineItem::new("p1", 2)]);
        assert_eq!(cart.list(), vec![LineItem::new("p1", 2)]);
    }

    #[test]
    fn test_remove_filters_by_id() {
        let cart = store();
        cart.add("p1", Some(1));
        cart.add("p2", Some(1));

        let items = cart.remove("p1");
        assert_eq!(items, vec![LineItem::new("p2", 1)]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let cart = store();
        cart.add("p1", Some(3));

        cart.clear();
        assert!(cart.list().is_empty());
        assert_eq!(cart.total_quantity(), 0);

        cart.clear();
        assert!(cart.list().is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_malformed_payload_reads_as_empty() {
        let cart = CartStore::new(Arc::new(MemoryStorage::with_payload("{ not json")));
        assert!(cart.list().is_empty());

        // the cart stays usable
        let items = cart.add("p1", Some(1));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_state_persists_across_store_instances() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());

        let cart = CartStore::new(storage.clone());
        cart.add("p1", Some(2));
        drop(cart);

        let reopened = CartStore::new(storage);
        assert_eq!(reopened.list(), vec![LineItem::new("p1", 2)]);
    }

    #[tokio::test]
    async fn test_every_mutation_notifies() {
        let cart = store();
        let mut rx = cart.subscribe();

        cart.add("p1", Some(2));
        cart.update("p1", 4);
        cart.remove("p1");
        cart.clear();

        let event = rx.recv().await.expect("add event");
        assert_eq!(event.items, vec![LineItem::new("p1", 2)]);
        let event = rx.recv().await.expect("update event");
        assert_eq!(event.items, vec![LineItem::new("p1", 4)]);
        let event = rx.recv().await.expect("remove event");
        assert!(event.items.is_empty());
        let event = rx.recv().await.expect("clear event");
        assert!(event.items.is_empty());
    }

    #[tokio::test]
    async fn test_update_of_unknown_product_does_not_notify() {
        let cart = store();
        let mut rx = cart.subscribe();

        cart.update("ghost", 5);
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }
}
