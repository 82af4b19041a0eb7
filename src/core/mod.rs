//! Business logic for the storefront client core.
//!
//! This module provides:
//! - [`DataCache`] - TTL cache for API payloads with offline stale-serve
//! - [`ImageCache`] - Reachability cache for remote image URLs
//! - [`CartStore`] - The durable cart ledger with change subscriptions
//! - [`CheckoutMemory`], [`OrderLedger`], [`OrderApi`] - Checkout persistence and submission

pub mod cache;
pub mod cart;
pub mod checkout;
pub mod error;
pub mod image_cache;

pub use cache::DataCache;
pub use cart::{CartStore, CartSubscription};
pub use checkout::{CheckoutMemory, OrderApi, OrderLedger};
pub use error::{CheckoutError, FetchError, StorageError};
pub use image_cache::ImageCache;
