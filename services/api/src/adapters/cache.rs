//! services/api/src/adapters/cache.rs
//!
//! An in-memory TTL cache for comparison responses, keyed by
//! `comparison:{list_id}:{zip_code}`. Entries expire on read; a list
//! mutation invalidates every cached comparison for that list.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

const PREFIX_COMPARISON: &str = "comparison";

struct CacheEntry {
    expires_at: Instant,
    value: serde_json::Value,
}

/// Caches serialized comparison results for a bounded time.
///
/// Comparison entries live for half the default TTL, since the underlying
/// list is more likely to change than catalog or price data.
pub struct ComparisonCache {
    default_ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ComparisonCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn make_key(list_id: Uuid, zip_code: &str) -> String {
        format!("{}:{}:{}", PREFIX_COMPARISON, list_id, zip_code)
    }

    /// A cached comparison, or `None` when absent or expired. Expired
    /// entries are removed on the way out.
    pub fn get(&self, list_id: Uuid, zip_code: &str) -> Option<serde_json::Value> {
        let key = Self::make_key(list_id, zip_code);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let expired = matches!(
            entries.get(&key),
            Some(entry) if entry.expires_at <= Instant::now()
        );
        if expired {
            entries.remove(&key);
            return None;
        }

        entries.get(&key).map(|entry| entry.value.clone())
    }

    /// Caches a comparison response under the shortened comparison TTL.
    pub fn set(&self, list_id: Uuid, zip_code: &str, value: serde_json::Value) {
        let ttl = self.default_ttl / 2;
        let key = Self::make_key(list_id, zip_code);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            CacheEntry {
                expires_at: Instant::now() + ttl,
                value,
            },
        );
    }

    /// Drops every cached comparison for a list, across all ZIP codes.
    /// Returns the number of entries removed.
    pub fn invalidate_list(&self, list_id: Uuid) -> usize {
        let prefix = format!("{}:{}:", PREFIX_COMPARISON, list_id);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(&prefix));
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get_round_trips() {
        let cache = ComparisonCache::new(Duration::from_secs(60));
        let list_id = Uuid::new_v4();

        cache.set(list_id, "92101", json!({"total": 4.99}));

        assert_eq!(
            cache.get(list_id, "92101"),
            Some(json!({"total": 4.99}))
        );
        assert_eq!(cache.get(list_id, "92102"), None);
    }

    #[test]
    fn entries_expire_after_the_ttl() {
        // Default 20ms, so comparison entries live 10ms.
        let cache = ComparisonCache::new(Duration::from_millis(20));
        let list_id = Uuid::new_v4();

        cache.set(list_id, "92101", json!(1));
        assert!(cache.get(list_id, "92101").is_some());

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get(list_id, "92101"), None);
    }

    #[test]
    fn invalidation_is_scoped_to_one_list() {
        let cache = ComparisonCache::new(Duration::from_secs(60));
        let list_a = Uuid::new_v4();
        let list_b = Uuid::new_v4();

        cache.set(list_a, "92101", json!(1));
        cache.set(list_a, "92103", json!(2));
        cache.set(list_b, "92101", json!(3));

        assert_eq!(cache.invalidate_list(list_a), 2);
        assert_eq!(cache.get(list_a, "92101"), None);
        assert_eq!(cache.get(list_a, "92103"), None);
        assert_eq!(cache.get(list_b, "92101"), Some(json!(3)));
    }
}
