//! Image reference cache.
//!
//! Records which remote image URLs have been confirmed reachable so product
//! and article pages keep rendering them while the backend sleeps. Only the
//! URL and a timestamp are stored, never image bytes; the browser's own HTTP
//! cache holds the pixels.
//!
//! Keys are `goimay_image_<hash>` where the hash is a small rolling hash of
//! the URL, kept bit-identical to the keys earlier clients wrote. Collisions
//! would merely let one cached URL shadow another, which is accepted.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::{IMAGE_CACHE_PREFIX, IMAGE_CACHE_TTL_MS, REMOTE_MEDIA_HOSTS};
use crate::utils::dom;
use crate::utils::env::Clock;
use crate::utils::kv::KeyValueStore;

#[derive(Debug, Serialize, Deserialize)]
struct ImageCacheEntry {
    url: String,
    timestamp: u64,
    ttl: u64,
}

/// Rolling 31x multiply hash over UTF-16 code units, wrapped to i32.
///
/// Matches `(h << 5) - h + c` with JS int32 coercion, so keys derived here
/// find entries written by previous clients.
fn url_hash(url: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in url.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}

fn image_cache_key(url: &str) -> String {
    format!("{}{}", IMAGE_CACHE_PREFIX, url_hash(url))
}

/// A URL counts as remote media when it names a recognized CDN host or is
/// plainly absolute; relative API paths and data URIs are ignored.
fn is_remote_media_url(url: &str) -> bool {
    REMOTE_MEDIA_HOSTS.iter().any(|host| url.contains(host)) || url.starts_with("http")
}

/// Reachability cache for remote image URLs.
#[derive(Clone)]
pub struct ImageCache {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
}

impl ImageCache {
    pub fn new(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Record `image_url` as reachable.
    ///
    /// No-op for empty input, for URLs that are not remote media, and when
    /// an unexpired record already exists. Write failures are warned and
    /// swallowed; a missed image record never breaks a page.
    pub fn cache_image(&self, image_url: &str) {
        if image_url.is_empty() {
            return;
        }

        let key = image_cache_key(image_url);
        if let Some(raw) = self.store.get(&key)
            && let Ok(entry) = serde_json::from_str::<ImageCacheEntry>(&raw)
            && self.clock.now_ms().saturating_sub(entry.timestamp) < entry.ttl
        {
            return;
        }

        if !is_remote_media_url(image_url) {
            return;
        }

        let entry = ImageCacheEntry {
            url: image_url.to_string(),
            timestamp: self.clock.now_ms(),
            ttl: IMAGE_CACHE_TTL_MS,
        };
        let Ok(payload) = serde_json::to_string(&entry) else {
            return;
        };
        if let Err(err) = self.store.set(&key, &payload) {
            dom::warn(&format!("image cache error for {}: {}", image_url, err));
        }
    }

    /// Record a batch of URLs; one bad URL never blocks the rest.
    pub fn cache_images<'a>(&self, image_urls: impl IntoIterator<Item = &'a str>) {
        for url in image_urls {
            self.cache_image(url);
        }
    }

    /// The previously confirmed URL for `image_url`, if still within TTL.
    ///
    /// Expired records are deleted and read as a miss. The returned URL is
    /// the one that was stored; this cache tracks reachability, it never
    /// rewrites URLs.
    pub fn get_cached(&self, image_url: &str) -> Option<String> {
        if image_url.is_empty() {
            return None;
        }

        let key = image_cache_key(image_url);
        let raw = self.store.get(&key)?;
        let entry: ImageCacheEntry = serde_json::from_str(&raw).ok()?;

        if self.clock.now_ms().saturating_sub(entry.timestamp) > entry.ttl {
            self.store.remove(&key);
            return None;
        }

        Some(entry.url)
    }

    /// Drop the record for `image_url`, if any.
    pub fn remove(&self, image_url: &str) {
        if !image_url.is_empty() {
            self.store.remove(&image_cache_key(image_url));
        }
    }

    /// Drop every record under this cache's prefix.
    pub fn clear_all(&self) {
        for key in self.store.keys() {
            if key.starts_with(IMAGE_CACHE_PREFIX) {
                self.store.remove(&key);
            }
        }
    }

    /// Delete records whose age exceeds their stored TTL; unparsable
    /// records are deleted outright.
    pub fn sweep_expired(&self) {
        let now = self.clock.now_ms();
        for key in self.store.keys() {
            if !key.starts_with(IMAGE_CACHE_PREFIX) {
                continue;
            }
            let Some(raw) = self.store.get(&key) else {
                continue;
            };
            match serde_json::from_str::<ImageCacheEntry>(&raw) {
                Ok(entry) if now.saturating_sub(entry.timestamp) <= entry.ttl => {}
                _ => self.store.remove(&key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::env::ManualClock;
    use crate::utils::kv::MemoryStore;

    const CLOUDINARY_URL: &str =
        "https://res.cloudinary.com/goimay/image/upload/v1/products/tra-hoa-cuc.jpg";

    fn fixture() -> (ImageCache, Rc<MemoryStore>, Rc<ManualClock>) {
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(ManualClock::new(1_000));
        let cache = ImageCache::new(store.clone(), clock.clone());
        (cache, store, clock)
    }

    #[test]
    fn test_url_hash_matches_legacy_keys() {
        // Values pinned against the original frontend's hash.
        assert_eq!(url_hash("a"), 97);
        assert_eq!(url_hash(CLOUDINARY_URL), 142680464);
        assert_eq!(url_hash("https://cdn.cloudinary.com/goimay/banner.png"), 159565332);
        assert_eq!(url_hash("http://localhost:8080/api/files/1.png"), 1304326361);
    }

    #[test]
    fn test_cache_then_get_returns_same_url() {
        let (cache, store, _) = fixture();
        cache.cache_image(CLOUDINARY_URL);
        assert_eq!(cache.get_cached(CLOUDINARY_URL).as_deref(), Some(CLOUDINARY_URL));
        assert!(store.get(&format!("goimay_image_{}", 142680464)).is_some());
    }

    #[test]
    fn test_non_media_urls_are_ignored() {
        let (cache, store, _) = fixture();
        cache.cache_image("/uploads/local.png");
        cache.cache_image("data:image/png;base64,AAAA");
        cache.cache_image("");
        assert!(store.is_empty());
    }

    #[test]
    fn test_recache_within_ttl_keeps_original_record() {
        let (cache, store, clock) = fixture();
        cache.cache_image(CLOUDINARY_URL);
        let key = image_cache_key(CLOUDINARY_URL);
        let first = store.get(&key).unwrap();

        clock.advance(60_000);
        cache.cache_image(CLOUDINARY_URL);
        assert_eq!(store.get(&key).unwrap(), first);
    }

    #[test]
    fn test_expired_record_is_recached() {
        let (cache, store, clock) = fixture();
        cache.cache_image(CLOUDINARY_URL);
        let key = image_cache_key(CLOUDINARY_URL);
        let first = store.get(&key).unwrap();

        clock.advance(IMAGE_CACHE_TTL_MS + 1);
        cache.cache_image(CLOUDINARY_URL);
        assert_ne!(store.get(&key).unwrap(), first);
    }

    #[test]
    fn test_expired_record_reads_as_miss_and_is_deleted() {
        let (cache, store, clock) = fixture();
        cache.cache_image(CLOUDINARY_URL);
        clock.advance(IMAGE_CACHE_TTL_MS + 1);
        assert_eq!(cache.get_cached(CLOUDINARY_URL), None);
        assert!(store.get(&image_cache_key(CLOUDINARY_URL)).is_none());
    }

    #[test]
    fn test_bulk_caching_skips_bad_urls_independently() {
        let (cache, _, _) = fixture();
        cache.cache_images(["", "/relative.png", CLOUDINARY_URL]);
        assert!(cache.get_cached(CLOUDINARY_URL).is_some());
        assert_eq!(cache.get_cached("/relative.png"), None);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let (cache, store, _) = fixture();
        store.fail_writes(true);
        cache.cache_image(CLOUDINARY_URL);
        assert_eq!(cache.get_cached(CLOUDINARY_URL), None);
    }

    #[test]
    fn test_sweep_and_clear_are_prefix_scoped() {
        let (cache, store, clock) = fixture();
        cache.cache_image(CLOUDINARY_URL);
        store.set("goimay_image_999", "corrupt").unwrap();
        store.set("goimay_cart", "{\"items\":[]}").unwrap();

        cache.sweep_expired();
        assert!(store.get("goimay_image_999").is_none());
        assert!(cache.get_cached(CLOUDINARY_URL).is_some());

        clock.advance(IMAGE_CACHE_TTL_MS + 1);
        cache.sweep_expired();
        assert_eq!(cache.get_cached(CLOUDINARY_URL), None);

        cache.cache_image(CLOUDINARY_URL);
        cache.clear_all();
        assert_eq!(cache.get_cached(CLOUDINARY_URL), None);
        assert!(store.get("goimay_cart").is_some());
    }
}
