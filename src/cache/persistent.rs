//! Persistent tier of the two-tier cache (spec.md §4.4, §6). One file per
//! URL-hash key, each holding a `{value, expiresAt}` JSON envelope,
//! written via a temp file + atomic rename so a crash mid-write can never
//! leave a half-written cache entry. Every failure mode — missing file,
//! corrupted content, expired entry, unwritable directory — degrades to
//! `None`/`false` rather than propagating, so a broken cache directory
//! never takes the pipeline down with it (spec.md §4.4: "a degraded cache
//! never breaks the pipeline").

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    value: serde_json::Value,
    /// Unix timestamp (seconds) after which the entry is considered
    /// expired.
    expires_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub total_size: u64,
    pub max_size: u64,
    pub location: PathBuf,
}

pub struct PersistentCache {
    dir: PathBuf,
    max_size: u64,
}

impl PersistentCache {
    /// Creates a cache rooted at `dir`, expanding a leading `~` to the
    /// user's home directory and creating missing directories along the
    /// way (spec.md §4.4).
    pub fn new(dir: impl AsRef<Path>, max_size: u64) -> Self {
        let dir = expand_home(dir.as_ref());
        if let Err(err) = fs::create_dir_all(&dir) {
            warn!("could not create cache directory '{}': {err}", dir.display());
        }
        PersistentCache { dir, max_size }
    }

    pub fn location(&self) -> &Path {
        &self.dir
    }

    fn path_for_key(&self, key: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.dir.join(format!("{:016x}.json", hasher.finish()))
    }

    /// Returns the cached payload, or `None` on a cache miss, an expired
    /// entry, or any I/O/deserialization error.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let path = self.path_for_key(key);
        let raw = fs::read_to_string(&path).ok()?;
        let envelope: CacheEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                debug!("cache entry '{}' is corrupted ({err}), treating as a miss", path.display());
                return None;
            }
        };

        if now_unix() >= envelope.expires_at {
            debug!("cache entry '{}' has expired", path.display());
            return None;
        }

        Some(envelope.value)
    }

    /// Writes `value` under `key` with the given TTL (or the cache's
    /// default), via temp-file + atomic rename. Any filesystem failure is
    /// swallowed; no `.tmp` artifact remains after a normal write.
    pub fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        let path = self.path_for_key(key);
        let tmp_path = path.with_extension("json.tmp");

        let envelope = CacheEnvelope {
            value,
            expires_at: now_unix() + ttl.as_secs(),
        };

        let serialized = match serde_json::to_string(&envelope) {
            Ok(s) => s,
            Err(err) => {
                warn!("could not serialize cache entry for write: {err}");
                return;
            }
        };

        if let Err(err) = fs::write(&tmp_path, serialized) {
            warn!("could not write cache temp file '{}': {err}", tmp_path.display());
            let _ = fs::remove_file(&tmp_path);
            return;
        }

        if let Err(err) = fs::rename(&tmp_path, &path) {
            warn!("could not rename cache temp file into place: {err}");
            let _ = fs::remove_file(&tmp_path);
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn delete(&self, key: &str) -> bool {
        let path = self.path_for_key(key);
        fs::remove_file(path).is_ok()
    }

    pub fn clear(&self) {
        let Ok(read_dir) = fs::read_dir(&self.dir) else {
            return;
        };
        for entry in read_dir.flatten() {
            let _ = fs::remove_file(entry.path());
        }
    }

    pub fn get_stats(&self) -> CacheStats {
        let mut valid_entries = 0;
        let mut expired_entries = 0;
        let mut total_size = 0u64;

        if let Ok(read_dir) = fs::read_dir(&self.dir) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                if let Ok(metadata) = entry.metadata() {
                    total_size += metadata.len();
                }
                match fs::read_to_string(&path).ok().and_then(|raw| {
                    serde_json::from_str::<CacheEnvelope>(&raw).ok()
                }) {
                    Some(envelope) if now_unix() < envelope.expires_at => valid_entries += 1,
                    Some(_) => expired_entries += 1,
                    None => {}
                }
            }
        }

        CacheStats {
            valid_entries,
            expired_entries,
            total_size,
            max_size: self.max_size,
            location: self.dir.clone(),
        }
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn expand_home(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    } else if raw == "~" {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn set_then_get_within_ttl_returns_value() {
        let dir = tempdir().unwrap();
        let cache = PersistentCache::new(dir.path(), 1024 * 1024);
        cache.set("key", serde_json::json!({"a": 1}), Duration::from_secs(60));
        assert_eq!(cache.get("key"), Some(serde_json::json!({"a": 1})));
    }

    #[test]
    fn get_after_ttl_expiry_returns_none() {
        let dir = tempdir().unwrap();
        let cache = PersistentCache::new(dir.path(), 1024 * 1024);
        cache.set("key", serde_json::json!(1), Duration::from_secs(0));
        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(cache.get("key"), None);
    }

    #[test]
    fn missing_entry_returns_none_not_error() {
        let dir = tempdir().unwrap();
        let cache = PersistentCache::new(dir.path(), 1024 * 1024);
        assert_eq!(cache.get("does-not-exist"), None);
    }

    #[test]
    fn corrupted_entry_is_treated_as_a_miss() {
        let dir = tempdir().unwrap();
        let cache = PersistentCache::new(dir.path(), 1024 * 1024);
        let path = cache.path_for_key("key");
        fs::write(&path, "not valid json").unwrap();
        assert_eq!(cache.get("key"), None);
    }

    #[test]
    fn no_tmp_artifacts_remain_after_a_normal_write() {
        let dir = tempdir().unwrap();
        let cache = PersistentCache::new(dir.path(), 1024 * 1024);
        cache.set("key", serde_json::json!(1), Duration::from_secs(60));
        let tmp_count = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter(|e| e.path().extension().and_then(|e| e.to_str()) == Some("tmp"))
            .count();
        assert_eq!(tmp_count, 0);
    }

    #[test]
    fn delete_and_clear_behave_consistently() {
        let dir = tempdir().unwrap();
        let cache = PersistentCache::new(dir.path(), 1024 * 1024);
        cache.set("a", serde_json::json!(1), Duration::from_secs(60));
        cache.set("b", serde_json::json!(2), Duration::from_secs(60));
        assert!(cache.delete("a"));
        assert!(!cache.has("a"));
        cache.clear();
        assert!(!cache.has("b"));
    }

    #[test]
    fn get_stats_reports_valid_and_expired_counts() {
        let dir = tempdir().unwrap();
        let cache = PersistentCache::new(dir.path(), 2048);
        cache.set("a", serde_json::json!(1), Duration::from_secs(60));
        cache.set("b", serde_json::json!(2), Duration::from_secs(0));
        std::thread::sleep(Duration::from_millis(1100));
        let stats = cache.get_stats();
        assert_eq!(stats.valid_entries, 1);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(stats.max_size, 2048);
    }
}
