//! On-disk cache of the last metering-data API response
//!
//! The file holds `{"_cached_at": <unix seconds>, "data": <raw response>}`.

use crate::core::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    #[serde(rename = "_cached_at", default)]
    cached_at: f64,
    #[serde(default)]
    data: Value,
}

/// Raw API data with the unix time (seconds) it was fetched at
#[derive(Debug, Clone, PartialEq)]
pub struct Cached {
    pub data: Value,
    pub cached_at: f64,
}

/// File-backed response cache with a freshness window
pub struct ApiCache {
    path: PathBuf,
    ttl_secs: u64,
}

impl ApiCache {
    pub fn new(path: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            path: path.into(),
            ttl_secs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached data if it is younger than the TTL
    pub fn load_fresh(&self, now: DateTime<Utc>) -> Option<Cached> {
        let cached = self.load_stale()?;
        if unix_secs(now) - cached.cached_at < self.ttl_secs as f64 {
            Some(cached)
        } else {
            log::debug!("Cache at {} is expired", self.path.display());
            None
        }
    }

    /// Cached data regardless of age
    pub fn load_stale(&self) -> Option<Cached> {
        if !self.path.exists() {
            return None;
        }

        match self.read_entry() {
            Ok(entry) => Some(Cached {
                data: entry.data,
                cached_at: entry.cached_at,
            }),
            Err(e) => {
                log::warn!("Failed to read cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn read_entry(&self) -> Result<CacheEntry> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the cache through a temporary file so readers never see a partial file
    pub fn store(&self, data: &Value, now: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let entry = CacheEntry {
            cached_at: unix_secs(now),
            data: data.clone(),
        };

        let mut tmp_name = self.path.clone().into_os_string();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        let mut file = fs::File::create(&tmp)?;
        file.write_all(serde_json::to_string(&entry)?.as_bytes())?;
        if let Err(e) = file.sync_all() {
            log::debug!("fsync of {} failed: {}", tmp.display(), e);
        }
        drop(file);

        fs::rename(&tmp, &self.path)?;
        log::info!("Wrote cache to {}", self.path.display());
        Ok(())
    }

    /// Delete the cache file. Returns true if a file was removed.
    pub fn clear(&self) -> bool {
        if !self.path.exists() {
            return false;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to remove cache {}: {}", self.path.display(), e);
                false
            }
        }
    }
}

/// Unix time in fractional seconds
pub fn unix_secs(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::{tempdir, TempDir};

    fn test_cache(ttl_secs: u64) -> (TempDir, ApiCache) {
        let dir = tempdir().expect("temp dir");
        let cache = ApiCache::new(dir.path().join("api_cache.json"), ttl_secs);
        (dir, cache)
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_missing_file() {
        let (_dir, cache) = test_cache(3600);
        assert!(cache.load_fresh(base_time()).is_none());
        assert!(cache.load_stale().is_none());
        assert!(!cache.clear());
    }

    #[test]
    fn test_fresh_then_expired() {
        let (_dir, cache) = test_cache(3600);
        let data = serde_json::json!([{ "meteringPointEic": "38ZEE-0001" }]);
        cache.store(&data, base_time()).unwrap();

        let fresh = cache.load_fresh(base_time() + Duration::minutes(30)).unwrap();
        assert_eq!(fresh.data, data);
        assert_eq!(fresh.cached_at, unix_secs(base_time()));

        let later = base_time() + Duration::hours(2);
        assert!(cache.load_fresh(later).is_none());
        assert_eq!(cache.load_stale().unwrap().data, data);

        assert!(cache.clear());
        assert!(!cache.path().exists());
    }

    #[test]
    fn test_store_creates_parent_directory() {
        let dir = tempdir().expect("temp dir");
        let cache = ApiCache::new(dir.path().join("nested").join("api_cache.json"), 3600);
        cache.store(&serde_json::json!([]), base_time()).unwrap();
        assert!(cache.path().exists());
        assert!(!dir.path().join("nested").join("api_cache.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_a_miss() {
        let (_dir, cache) = test_cache(3600);
        fs::write(cache.path(), "{not json").unwrap();
        assert!(cache.load_stale().is_none());
    }

    #[test]
    fn test_reads_entry_written_elsewhere() {
        let (_dir, cache) = test_cache(3600);
        fs::write(cache.path(), r#"{"_cached_at": 1705320000.5, "data": []}"#).unwrap();
        let cached = cache.load_stale().unwrap();
        assert_eq!(cached.cached_at, 1705320000.5);
        assert_eq!(cached.data, serde_json::json!([]));
    }
}
