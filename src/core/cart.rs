//! Durable shopping-cart ledger.
//!
//! The cart is a singleton record under a fixed key, one line per product.
//! Every mutation re-reads, edits, persists, then notifies: registered
//! subscribers synchronously, and same-tab window listeners through the
//! `cart_updated` event (the native `storage` event only reaches other
//! tabs). Cross-tab writes are last-write-wins; no merge is attempted.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::{CART_KEY, CART_UPDATED_EVENT};
use crate::models::{Cart, CartItem, ProductSummary};
use crate::utils::dom;
use crate::utils::env::Clock;
use crate::utils::kv::KeyValueStore;

/// Handle returned by [`CartStore::subscribe`]; pass back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSubscription(u64);

type Subscriber = Box<dyn Fn(&Cart)>;

/// The cart ledger and its change-notification list.
pub struct CartStore {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    subscribers: RefCell<Vec<(u64, Subscriber)>>,
    next_subscriber: Cell<u64>,
}

impl CartStore {
    pub fn new(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            subscribers: RefCell::new(Vec::new()),
            next_subscriber: Cell::new(0),
        }
    }

    /// Read the current cart.
    ///
    /// Absent, corrupt, or shape-mismatched data reads as an empty cart;
    /// this never fails.
    pub fn cart(&self) -> Cart {
        let Some(raw) = self.store.get(CART_KEY) else {
            return Cart::default();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    /// Persist `cart` and notify listeners.
    ///
    /// A rejected write is warned and dropped without notifying, so
    /// listeners only ever observe states that were actually stored.
    pub fn set_cart(&self, cart: &Cart) {
        let Ok(payload) = serde_json::to_string(cart) else {
            return;
        };
        if let Err(err) = self.store.set(CART_KEY, &payload) {
            dom::warn(&format!("cart write error: {}", err));
            return;
        }
        self.notify(cart);
    }

    /// Add `quantity` of a product (floored to 1).
    ///
    /// A product without an id is ignored. An existing line has its
    /// quantity increased; otherwise a new line is unshifted to the front.
    /// Either way the result is clamped to the product's stock when that is
    /// a known positive number.
    pub fn add(&self, product: &ProductSummary, quantity: u32) {
        let Some(product_id) = product.id else {
            return;
        };

        let mut cart = self.cart();
        let qty = quantity.max(1);
        let limit = product.stock_limit();

        if let Some(item) = cart
            .items
            .iter_mut()
            .find(|it| it.product_id == product_id)
        {
            let next = item.quantity.saturating_add(qty);
            item.quantity = match limit {
                Some(max) => next.min(max),
                None => next,
            };
        } else {
            let quantity = match limit {
                Some(max) => qty.min(max),
                None => qty,
            };
            cart.items.insert(
                0,
                CartItem {
                    product_id,
                    slug: product.slug.clone(),
                    name: product.name.clone(),
                    thumbnail: product.thumbnail.clone(),
                    price: product.price,
                    sale_price: product.sale_price,
                    product_category: product.product_category.clone(),
                    stock: product.stock,
                    quantity,
                    added_at: self.clock.now_iso(),
                },
            );
        }

        self.set_cart(&cart);
    }

    /// Set a line's quantity. Zero removes the line; anything else is
    /// clamped to the stock recorded at add time. Unknown products are
    /// ignored. Position in the cart is preserved.
    pub fn update_quantity(&self, product_id: u64, quantity: u32) {
        let mut cart = self.cart();
        let Some(pos) = cart
            .items
            .iter()
            .position(|it| it.product_id == product_id)
        else {
            return;
        };

        if quantity == 0 {
            cart.items.remove(pos);
        } else {
            let item = &mut cart.items[pos];
            item.quantity = match item.stock_limit() {
                Some(max) => quantity.min(max),
                None => quantity,
            };
        }

        self.set_cart(&cart);
    }

    /// Remove a line entirely; no error if absent.
    pub fn remove(&self, product_id: u64) {
        let mut cart = self.cart();
        cart.items.retain(|it| it.product_id != product_id);
        self.set_cart(&cart);
    }

    /// Reset to an empty cart.
    pub fn clear(&self) {
        self.set_cart(&Cart::default());
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.cart().item_count()
    }

    /// Cart total with sale-price precedence.
    pub fn total(&self) -> f64 {
        self.cart().total()
    }

    /// Register a listener invoked synchronously after every persisted
    /// mutation, in registration order.
    ///
    /// Listeners must not subscribe or unsubscribe from within a
    /// notification.
    pub fn subscribe(&self, listener: impl Fn(&Cart) + 'static) -> CartSubscription {
        let id = self.next_subscriber.get();
        self.next_subscriber.set(id + 1);
        self.subscribers.borrow_mut().push((id, Box::new(listener)));
        CartSubscription(id)
    }

    pub fn unsubscribe(&self, subscription: CartSubscription) {
        self.subscribers
            .borrow_mut()
            .retain(|(id, _)| *id != subscription.0);
    }

    /// Re-read the cart and notify listeners without writing.
    ///
    /// Used when another tab changed the stored cart (observed through the
    /// native `storage` event).
    pub fn notify_external_change(&self) {
        let cart = self.cart();
        self.notify(&cart);
    }

    fn notify(&self, cart: &Cart) {
        for (_, listener) in self.subscribers.borrow().iter() {
            listener(cart);
        }
        dom::dispatch_window_event(CART_UPDATED_EVENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::env::ManualClock;
    use crate::utils::kv::MemoryStore;

    fn fixture() -> (CartStore, Rc<MemoryStore>) {
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(ManualClock::new(1_722_860_000_123));
        (CartStore::new(store.clone(), clock), store)
    }

    fn product(id: u64, stock: Option<u32>) -> ProductSummary {
        ProductSummary {
            id: Some(id),
            slug: format!("san-pham-{}", id),
            name: format!("Sản phẩm {}", id),
            thumbnail: "thumb.jpg".to_string(),
            price: 100.0,
            sale_price: None,
            product_category: None,
            stock,
        }
    }

    #[test]
    fn test_empty_store_reads_as_empty_cart() {
        let (cart_store, _) = fixture();
        assert!(cart_store.cart().is_empty());
    }

    #[test]
    fn test_corrupt_data_reads_as_empty_cart() {
        let (cart_store, store) = fixture();
        store.set(CART_KEY, "{invalid json").unwrap();
        assert!(cart_store.cart().is_empty());

        store.set(CART_KEY, r#"{"items":"not an array"}"#).unwrap();
        assert!(cart_store.cart().is_empty());

        store.set(CART_KEY, "null").unwrap();
        assert!(cart_store.cart().is_empty());
    }

    #[test]
    fn test_add_merges_lines_by_product_id() {
        let (cart_store, _) = fixture();
        cart_store.add(&product(1, None), 2);
        cart_store.add(&product(1, None), 3);

        let cart = cart_store.cart();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
    }

    #[test]
    fn test_add_clamps_to_stock() {
        let (cart_store, _) = fixture();
        cart_store.add(&product(1, Some(4)), 10);
        assert_eq!(cart_store.cart().items[0].quantity, 4);

        // Repeated adds stay clamped.
        cart_store.add(&product(1, Some(4)), 1);
        assert_eq!(cart_store.cart().items[0].quantity, 4);
    }

    #[test]
    fn test_zero_stock_imposes_no_clamp() {
        let (cart_store, _) = fixture();
        cart_store.add(&product(1, Some(0)), 10);
        assert_eq!(cart_store.cart().items[0].quantity, 10);
    }

    #[test]
    fn test_add_floors_quantity_to_one() {
        let (cart_store, _) = fixture();
        cart_store.add(&product(1, None), 0);
        assert_eq!(cart_store.cart().items[0].quantity, 1);
    }

    #[test]
    fn test_add_without_id_is_ignored() {
        let (cart_store, _) = fixture();
        let mut nameless = product(1, None);
        nameless.id = None;
        cart_store.add(&nameless, 2);
        assert!(cart_store.cart().is_empty());
    }

    #[test]
    fn test_new_lines_go_to_the_front() {
        let (cart_store, _) = fixture();
        cart_store.add(&product(1, None), 1);
        cart_store.add(&product(2, None), 1);

        let cart = cart_store.cart();
        assert_eq!(cart.items[0].product_id, 2);
        assert_eq!(cart.items[1].product_id, 1);
    }

    #[test]
    fn test_quantity_update_preserves_position() {
        let (cart_store, _) = fixture();
        cart_store.add(&product(1, None), 1);
        cart_store.add(&product(2, None), 1);
        cart_store.update_quantity(1, 7);

        let cart = cart_store.cart();
        assert_eq!(cart.items[0].product_id, 2);
        assert_eq!(cart.items[1].product_id, 1);
        assert_eq!(cart.items[1].quantity, 7);
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let (cart_store, _) = fixture();
        cart_store.add(&product(1, None), 2);
        cart_store.update_quantity(1, 0);
        assert!(cart_store.cart().find(1).is_none());
    }

    #[test]
    fn test_update_clamps_to_recorded_stock() {
        let (cart_store, _) = fixture();
        cart_store.add(&product(1, Some(4)), 1);
        cart_store.update_quantity(1, 99);
        assert_eq!(cart_store.cart().items[0].quantity, 4);
    }

    #[test]
    fn test_update_of_unknown_product_is_silent() {
        let (cart_store, _) = fixture();
        let notified = Rc::new(Cell::new(0u32));
        let count = notified.clone();
        cart_store.subscribe(move |_| count.set(count.get() + 1));

        cart_store.update_quantity(404, 3);
        assert!(cart_store.cart().is_empty());
        assert_eq!(notified.get(), 0);
    }

    #[test]
    fn test_remove_filters_line_out() {
        let (cart_store, _) = fixture();
        cart_store.add(&product(1, None), 1);
        cart_store.add(&product(2, None), 1);
        cart_store.remove(1);

        let cart = cart_store.cart();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, 2);
    }

    #[test]
    fn test_clear_resets_to_empty() {
        let (cart_store, store) = fixture();
        cart_store.add(&product(1, None), 3);
        cart_store.clear();
        assert!(cart_store.cart().is_empty());
        assert_eq!(store.get(CART_KEY).as_deref(), Some(r#"{"items":[]}"#));
    }

    #[test]
    fn test_totals_prefer_sale_price() {
        let (cart_store, _) = fixture();
        let mut discounted = product(1, None);
        discounted.price = 100.0;
        discounted.sale_price = Some(80.0);
        let mut full_price = product(2, None);
        full_price.price = 50.0;

        cart_store.add(&discounted, 2);
        cart_store.add(&full_price, 1);

        assert_eq!(cart_store.total(), 210.0);
        assert_eq!(cart_store.item_count(), 3);
    }

    #[test]
    fn test_subscribers_observe_every_persisted_mutation() {
        let (cart_store, _) = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let subscription = cart_store.subscribe(move |cart: &Cart| {
            sink.borrow_mut().push(cart.item_count());
        });

        cart_store.add(&product(1, None), 2);
        cart_store.update_quantity(1, 5);
        cart_store.clear();
        assert_eq!(*seen.borrow(), vec![2, 5, 0]);

        cart_store.unsubscribe(subscription);
        cart_store.add(&product(1, None), 1);
        assert_eq!(*seen.borrow(), vec![2, 5, 0]);
    }

    #[test]
    fn test_failed_write_does_not_notify() {
        let (cart_store, store) = fixture();
        let notified = Rc::new(Cell::new(0u32));
        let count = notified.clone();
        cart_store.subscribe(move |_| count.set(count.get() + 1));

        store.fail_writes(true);
        cart_store.add(&product(1, None), 1);
        assert_eq!(notified.get(), 0);
        assert!(cart_store.cart().is_empty());
    }

    #[test]
    fn test_external_change_notification_rereads_store() {
        let (cart_store, store) = fixture();
        let seen = Rc::new(Cell::new(0u32));
        let sink = seen.clone();
        cart_store.subscribe(move |cart: &Cart| sink.set(cart.item_count()));

        // Simulates another tab writing the cart key.
        store
            .set(CART_KEY, r#"{"items":[{"productId":9,"quantity":4}]}"#)
            .unwrap();
        cart_store.notify_external_change();
        assert_eq!(seen.get(), 4);
    }

    #[test]
    fn test_added_at_is_stamped() {
        let (cart_store, _) = fixture();
        cart_store.add(&product(1, None), 1);
        assert_eq!(cart_store.cart().items[0].added_at, "2024-08-05T12:13:20.123Z");
    }
}
