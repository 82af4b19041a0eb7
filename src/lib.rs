//! Client-side core for the Gói Mây storefront.
//!
//! The storefront renders entirely in the browser against a small REST
//! backend that may be slow to wake. This crate is the layer between the UI
//! and the browser's persistent storage: it keeps API payloads and image
//! references cached with TTLs so pages paint instantly from cache and
//! refresh in the background, and it owns the durable state a shop client
//! needs across visits: the cart ledger, the remembered checkout contact,
//! and a local order history.
//!
//! Nothing here is required for correctness of the backend: caches are
//! advisory, every read has a defined fallback, and no public operation
//! panics or propagates an expected failure.
//!
//! Storage access goes through the [`utils::kv::KeyValueStore`] seam, and
//! time and connectivity are injected the same way, so the whole core runs
//! under native tests against an in-memory store.
//!
//! Typical browser setup:
//!
//! ```ignore
//! let services = Services::browser();
//! services.start_background_sweeps();
//! services.log_connectivity_changes();
//! services.sync_cart_across_tabs();
//! // hand `services` to the UI layer's context/provider
//! ```

pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::core::{
    CartStore, CartSubscription, CheckoutError, CheckoutMemory, DataCache, FetchError, ImageCache,
    OrderApi, OrderLedger, StorageError,
};
pub use crate::models::{
    Cart, CartItem, CheckoutCustomer, OrderItem, OrderRecord, OrderRequest, OrderResponse,
    PaymentMethod, ProductSummary,
};
pub use crate::services::{CheckoutForm, Services};
