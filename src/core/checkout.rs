//! Checkout contact memory, local order history, and the order API client.
//!
//! The contact record prefills the next checkout form; the ledger keeps a
//! newest-first trail of submitted orders so the account page can show them
//! even before the backend answers. Neither is validated here.

use std::rc::Rc;

use crate::config::{CHECKOUT_CUSTOMER_KEY, DEFAULT_API_BASE, ORDERS_KEY};
use crate::core::error::FetchError;
use crate::models::{CheckoutCustomer, OrderRecord, OrderRequest, OrderResponse};
use crate::utils::dom;
use crate::utils::fetch;
use crate::utils::kv::KeyValueStore;

// =============================================================================
// CheckoutMemory
// =============================================================================

/// Remembers the last shipping contact, overwritten wholesale on each
/// successful checkout.
#[derive(Clone)]
pub struct CheckoutMemory {
    store: Rc<dyn KeyValueStore>,
}

impl CheckoutMemory {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save_customer(&self, customer: &CheckoutCustomer) {
        let Ok(payload) = serde_json::to_string(customer) else {
            return;
        };
        if let Err(err) = self.store.set(CHECKOUT_CUSTOMER_KEY, &payload) {
            dom::warn(&format!("checkout contact write error: {}", err));
        }
    }

    /// The remembered contact, or `None` when absent or unparsable.
    pub fn customer(&self) -> Option<CheckoutCustomer> {
        let raw = self.store.get(CHECKOUT_CUSTOMER_KEY)?;
        serde_json::from_str(&raw).ok()
    }
}

// =============================================================================
// OrderLedger
// =============================================================================

/// Local order history, newest first.
#[derive(Clone)]
pub struct OrderLedger {
    store: Rc<dyn KeyValueStore>,
}

impl OrderLedger {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All remembered orders; absent or corrupt data reads as none.
    pub fn orders(&self) -> Vec<OrderRecord> {
        let Some(raw) = self.store.get(ORDERS_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    /// Prepend a record to the history.
    pub fn record(&self, order: &OrderRecord) {
        let mut orders = self.orders();
        orders.insert(0, order.clone());
        let Ok(payload) = serde_json::to_string(&orders) else {
            return;
        };
        if let Err(err) = self.store.set(ORDERS_KEY, &payload) {
            dom::warn(&format!("order history write error: {}", err));
        }
    }

    pub fn find(&self, order_id: u64) -> Option<OrderRecord> {
        self.orders().into_iter().find(|o| o.id == order_id)
    }
}

// =============================================================================
// OrderApi
// =============================================================================

/// Thin client for the backend order endpoint.
pub struct OrderApi {
    base_url: String,
}

impl OrderApi {
    /// `base_url` is the API root (e.g. `https://shop.example.com/api`);
    /// a trailing slash is tolerated.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client against the relative `/api` base, for same-origin deploys and
    /// dev proxies.
    pub fn relative() -> Self {
        Self::new(DEFAULT_API_BASE)
    }

    /// Submit an order. The backend re-resolves prices and responds with
    /// the created order's id.
    pub async fn create(&self, request: &OrderRequest) -> Result<OrderResponse, FetchError> {
        let url = format!("{}/orders", self.base_url);
        fetch::post_json(&url, request).await
    }
}
