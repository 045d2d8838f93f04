//! Persistent + In-Memory Cache (C4).

pub mod config;
pub mod error;
pub mod memory;
pub mod persistent;

pub use config::parse_size;
pub use error::CacheError;
pub use memory::MemoryCache;
pub use persistent::{CacheStats, PersistentCache};

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

/// The two-tier cache the HTTP client consults: an in-memory tier for
/// same-process reuse, backed by a persistent on-disk tier that survives
/// across process invocations (spec.md §4.4).
pub struct Cache {
    memory: MemoryCache,
    persistent: PersistentCache,
    default_ttl: Duration,
}

impl Cache {
    pub fn new(dir: PathBuf, max_size: u64, default_ttl: Duration) -> Self {
        Cache {
            memory: MemoryCache::new(default_ttl),
            persistent: PersistentCache::new(dir, max_size),
            default_ttl,
        }
    }

    /// The platform default cache directory, the same fallback chain
    /// PIVOT's `RedbCacher::default()` uses: a platform-appropriate
    /// project cache directory, falling back to `$HOME/<pkg name>`.
    pub fn default_dir() -> PathBuf {
        ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(env!("CARGO_PKG_NAME"))))
            .unwrap_or_else(|| PathBuf::from(".variant-linker-cache"))
    }

    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        if let Some(value) = self.memory.get(key) {
            return Some(value);
        }
        let value = self.persistent.get(key)?;
        self.memory.set(key, value.clone(), Some(self.default_ttl));
        Some(value)
    }

    pub fn set(&self, key: &str, value: serde_json::Value) {
        self.memory.set(key, value.clone(), Some(self.default_ttl));
        self.persistent.set(key, value, self.default_ttl);
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn delete(&self, key: &str) {
        self.memory.delete(key);
        self.persistent.delete(key);
    }

    pub fn clear(&self) {
        self.memory.clear();
        self.persistent.clear();
    }

    pub fn get_stats(&self) -> CacheStats {
        self.persistent.get_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_tier_is_populated_from_persistent_tier_on_miss() {
        let dir = tempdir().unwrap();
        let cache = Cache::new(dir.path().to_path_buf(), 1024 * 1024, Duration::from_secs(60));
        cache.set("k", serde_json::json!(42));

        // Fresh Cache instance pointed at the same directory: memory tier
        // starts cold, but the persistent tier still has it.
        let cache2 = Cache::new(dir.path().to_path_buf(), 1024 * 1024, Duration::from_secs(60));
        assert_eq!(cache2.get("k"), Some(serde_json::json!(42)));
    }
}
