//! Storefront client configuration.
//!
//! Centralizes the storage-key contract and timing constants shared by the
//! cache, cart, and checkout layers.

// =============================================================================
// Storage Keys
// =============================================================================
//
// These literals are the persistence contract with existing browser profiles.
// Changing any of them orphans data already stored under the old name.

/// localStorage key for the shopping cart ledger.
pub const CART_KEY: &str = "goimay_cart";

/// localStorage key for the remembered checkout contact.
pub const CHECKOUT_CUSTOMER_KEY: &str = "goimay_checkout_customer";

/// localStorage key for the local order history.
pub const ORDERS_KEY: &str = "goimay_orders";

/// Key prefix for TTL data cache entries.
pub const CACHE_PREFIX: &str = "goimay_cache_";

/// Key prefix for image reference cache entries.
pub const IMAGE_CACHE_PREFIX: &str = "goimay_image_";

// =============================================================================
// Cache Lifetimes
// =============================================================================

/// Default data cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL_MS: u64 = 5 * 60 * 1000;

/// Extended data cache TTL for offline support (24 hours).
pub const OFFLINE_CACHE_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Image reference cache TTL (7 days).
pub const IMAGE_CACHE_TTL_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// Background sweep cadence for expired entries.
pub mod sweep {
    /// Data cache sweep interval (10 minutes).
    pub const DATA_CACHE_INTERVAL_MS: u32 = 10 * 60 * 1000;
    /// Image cache sweep interval (24 hours).
    pub const IMAGE_CACHE_INTERVAL_MS: u32 = 24 * 60 * 60 * 1000;
}

// =============================================================================
// Remote Media
// =============================================================================

/// Host markers for recognized remote image CDNs.
///
/// A URL containing one of these (or any `http`-prefixed URL) is considered
/// remote media and eligible for the image reference cache.
pub const REMOTE_MEDIA_HOSTS: &[&str] = &["cloudinary.com", "res.cloudinary"];

// =============================================================================
// Network Configuration
// =============================================================================

/// Relative API base used when no backend origin is configured
/// (a dev proxy is expected to forward it).
pub const DEFAULT_API_BASE: &str = "/api";

/// Order submission timeout in milliseconds.
pub const ORDER_TIMEOUT_MS: i32 = 10000;

// =============================================================================
// Events
// =============================================================================

/// Same-tab window event dispatched after every cart write.
///
/// The native `storage` event only fires in *other* tabs, so same-tab
/// listeners rely on this custom event instead.
pub const CART_UPDATED_EVENT: &str = "cart_updated";
