//! Platform seams between the storefront core and its host.
//!
//! Provides:
//! - [`kv::KeyValueStore`] - String key-value contract with browser and in-memory impls
//! - [`env::Clock`], [`env::Connectivity`] - Injected time and network state
//! - [`dom`] - Window, storage, event, and console access (inert off-wasm)
//! - [`fetch::post_json`] - JSON submission with timeout racing

pub mod dom;
pub mod env;
pub mod fetch;
pub mod kv;

pub use env::{BrowserClock, Clock, Connectivity, ManualClock, NavigatorConnectivity, StaticConnectivity};
pub use kv::{BrowserStorage, KeyValueStore, MemoryStore, SharedStore};
