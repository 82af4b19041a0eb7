//! TTL data cache over the key-value store.
//!
//! Pages render cached API payloads immediately, then refetch in the
//! background and re-render, so navigation stays instant while the backend
//! may be slow or asleep. The cache is advisory: every failure degrades to
//! a cache miss and no operation here ever surfaces an error.
//!
//! Entries live under `goimay_cache_<url>_<params-json>` and carry their own
//! TTL, so a sweep can judge each entry by the lifetime it was stored with.

use std::rc::Rc;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::config::{CACHE_PREFIX, DEFAULT_CACHE_TTL_MS, OFFLINE_CACHE_TTL_MS};
use crate::utils::dom;
use crate::utils::env::{Clock, Connectivity};
use crate::utils::kv::KeyValueStore;

/// Stored cache record: payload plus its write time and lifetime.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    data: Value,
    timestamp: u64,
    ttl: u64,
}

/// Derive the storage key for a URL and its query params.
///
/// Params serialize to JSON so distinct queries against the same endpoint
/// get distinct entries; no params serializes as `{}`.
fn cache_key<P: Serialize>(url: &str, params: &P) -> String {
    let params_json = serde_json::to_string(params).unwrap_or_else(|_| "{}".to_string());
    format!("{}{}_{}", CACHE_PREFIX, url, params_json)
}

fn no_params() -> serde_json::Map<String, Value> {
    serde_json::Map::new()
}

/// TTL cache for API payloads.
#[derive(Clone)]
pub struct DataCache {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    connectivity: Rc<dyn Connectivity>,
}

impl DataCache {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        connectivity: Rc<dyn Connectivity>,
    ) -> Self {
        Self {
            store,
            clock,
            connectivity,
        }
    }

    /// Cache `data` for `url` with the default 5-minute TTL.
    pub fn set<T: Serialize>(&self, url: &str, data: &T) {
        self.set_with(url, data, DEFAULT_CACHE_TTL_MS, &no_params());
    }

    /// Cache `data` with the extended 24-hour TTL for offline support.
    pub fn set_offline<T: Serialize, P: Serialize>(&self, url: &str, data: &T, params: &P) {
        self.set_with(url, data, OFFLINE_CACHE_TTL_MS, params);
    }

    /// Cache `data` for `url` + `params` with an explicit TTL.
    ///
    /// On a rejected write (storage full or disabled) this logs a warning,
    /// makes one best-effort sweep of expired entries, and gives up; the
    /// cache is never required for correctness, so there is no retry.
    pub fn set_with<T: Serialize, P: Serialize>(&self, url: &str, data: &T, ttl_ms: u64, params: &P) {
        let key = cache_key(url, params);

        let data = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(err) => {
                dom::warn(&format!("cache set error for {}: {}", url, err));
                return;
            }
        };
        let entry = CacheEntry {
            data,
            timestamp: self.clock.now_ms(),
            ttl: ttl_ms,
        };
        let Ok(payload) = serde_json::to_string(&entry) else {
            return;
        };

        if let Err(err) = self.store.set(&key, &payload) {
            dom::warn(&format!("cache set error for {}: {}", url, err));
            self.sweep_expired();
        }
    }

    /// Get cached data for `url` with no params, allowing offline stale-serve.
    pub fn get<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        self.get_with(url, &no_params(), true)
    }

    /// Get cached data for `url` + `params`.
    ///
    /// Returns `None` when the entry is absent or unparsable. An expired
    /// entry is normally deleted and reported as a miss, with one exception:
    /// when `allow_expired` is set and the runtime reports no connectivity,
    /// the stale payload is served anyway so pages keep rendering offline.
    pub fn get_with<T: DeserializeOwned, P: Serialize>(
        &self,
        url: &str,
        params: &P,
        allow_expired: bool,
    ) -> Option<T> {
        let key = cache_key(url, params);
        let raw = self.store.get(&key)?;
        let entry: CacheEntry = serde_json::from_str(&raw).ok()?;

        let age = self.clock.now_ms().saturating_sub(entry.timestamp);
        if age > entry.ttl {
            if allow_expired && !self.connectivity.is_online() {
                dom::log(&format!("offline: serving expired cache for {}", url));
                return serde_json::from_value(entry.data).ok();
            }
            self.store.remove(&key);
            return None;
        }

        serde_json::from_value(entry.data).ok()
    }

    /// Drop the entry for `url` + `params`, if any.
    pub fn remove<P: Serialize>(&self, url: &str, params: &P) {
        self.store.remove(&cache_key(url, params));
    }

    /// Drop every entry under this cache's prefix.
    ///
    /// Unrelated keys (cart, checkout contact, image cache) are untouched.
    pub fn clear_all(&self) {
        for key in self.store.keys() {
            if key.starts_with(CACHE_PREFIX) {
                self.store.remove(&key);
            }
        }
    }

    /// Delete entries whose age exceeds their own stored TTL.
    ///
    /// Unparsable entries are deleted outright. Runs at startup and on a
    /// fixed interval for the lifetime of the page.
    pub fn sweep_expired(&self) {
        let now = self.clock.now_ms();
        for key in self.store.keys() {
            if !key.starts_with(CACHE_PREFIX) {
                continue;
            }
            let Some(raw) = self.store.get(&key) else {
                continue;
            };
            match serde_json::from_str::<CacheEntry>(&raw) {
                Ok(entry) if now.saturating_sub(entry.timestamp) <= entry.ttl => {}
                _ => self.store.remove(&key),
            }
        }
    }

    /// All keys currently held under this cache's prefix (debug aid).
    pub fn cached_keys(&self) -> Vec<String> {
        self.store
            .keys()
            .into_iter()
            .filter(|key| key.starts_with(CACHE_PREFIX))
            .collect()
    }

    /// Current connectivity report, for callers doing their own
    /// stale-while-revalidate scheduling.
    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }
}
