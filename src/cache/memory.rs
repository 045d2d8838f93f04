//! In-memory tier of the two-tier cache (spec.md §4.4). Keyed blob cache
//! with a TTL, for same-process reuse across chunk workers. Backed by a
//! single `RwLock`-guarded map rather than a lock-per-key structure — the
//! in-memory tier is consulted many times per second during a batch run,
//! but held only briefly, so a single lock is sufficient without pulling
//! in a concurrent-map dependency the teacher stack doesn't otherwise
//! need (see DESIGN.md for the simplification note against spec.md §5's
//! "per-key mutex" wording).

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct Entry {
    value: serde_json::Value,
    expires_at: Instant,
}

pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(default_ttl: Duration) -> Self {
        MemoryCache {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if Instant::now() >= entry.expires_at {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn set(&self, key: impl Into<String>, value: serde_json::Value, ttl: Option<Duration>) {
        let expires_at = Instant::now() + ttl.unwrap_or(self.default_ttl);
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), Entry { value, expires_at });
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn delete(&self, key: &str) -> bool {
        self.entries
            .write()
            .map(|mut entries| entries.remove(key).is_some())
            .unwrap_or(false)
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn set_then_get_within_ttl_returns_value() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("k", serde_json::json!({"a": 1}), None);
        assert_eq!(cache.get("k"), Some(serde_json::json!({"a": 1})));
    }

    #[test]
    fn get_after_ttl_expiry_returns_none() {
        let cache = MemoryCache::new(Duration::from_millis(10));
        cache.set("k", serde_json::json!(1), None);
        sleep(Duration::from_millis(30));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn delete_removes_entry() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("k", serde_json::json!(1), None);
        assert!(cache.delete("k"));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn clear_empties_cache() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("a", serde_json::json!(1), None);
        cache.set("b", serde_json::json!(2), None);
        cache.clear();
        assert!(cache.is_empty());
    }
}
