//! Custom error types for the storefront client core.
//!
//! Provides structured error handling for each domain:
//!
//! - [`StorageError`] - Persistent key-value store failures
//! - [`FetchError`] - Network errors during order submission
//! - [`CheckoutError`] - Checkout flow failures surfaced to the form
//!
//! Storage-backed read paths never return these: they degrade to documented
//! fallback values. Errors appear only where a caller can act on them
//! (store writes and checkout submission).

use std::fmt;

/// Persistent store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Storage backend not available (no window, or storage disabled).
    Unavailable,
    /// Write rejected, typically quota exhaustion.
    WriteFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "persistent storage not available"),
            Self::WriteFailed => write!(f, "failed to write to persistent storage"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Network errors for order submission.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// Browser window not available
    NoWindow,
    /// Failed to create HTTP request
    RequestCreationFailed,
    /// Network request failed (CORS, DNS, connection reset)
    NetworkError(String),
    /// HTTP error response (non-2xx status)
    HttpError(u16),
    /// Failed to read response body
    ResponseReadFailed,
    /// Invalid response content (not text)
    InvalidContent,
    /// JSON encoding or parsing error
    JsonParseError(String),
    /// Request timed out
    Timeout,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "Browser window not available"),
            Self::RequestCreationFailed => write!(f, "Failed to create request"),
            Self::NetworkError(msg) => write!(f, "Network error: {}", msg),
            Self::HttpError(status) => write!(f, "HTTP error: {}", status),
            Self::ResponseReadFailed => write!(f, "Failed to read response"),
            Self::InvalidContent => write!(f, "Invalid response content"),
            Self::JsonParseError(msg) => write!(f, "JSON parse error: {}", msg),
            Self::Timeout => write!(f, "Request timed out"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Checkout flow failures.
#[derive(Debug, Clone)]
pub enum CheckoutError {
    /// Nothing in the cart to order.
    EmptyCart,
    /// Order API accepted the request but returned no order id.
    MissingOrderId,
    /// Order API call failed.
    Api(FetchError),
}

impl fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCart => write!(f, "cart is empty"),
            Self::MissingOrderId => write!(f, "order response carried no order id"),
            Self::Api(err) => write!(f, "order submission failed: {}", err),
        }
    }
}

impl std::error::Error for CheckoutError {}

impl From<FetchError> for CheckoutError {
    fn from(err: FetchError) -> Self {
        Self::Api(err)
    }
}
