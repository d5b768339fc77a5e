//! Single-slot snapshot cache for the forecast store
//!
//! The snapshot is one JSON file in the per-user cache directory. Staleness
//! is judged by the file's modification time alone, never by the update
//! stamps carried inside the payload. Loading is infallible from the
//! caller's point of view: a missing, stale, or malformed snapshot is simply
//! not usable. Saving is best-effort; callers downgrade failures to a log
//! line.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::PollenflugError;
use crate::store::Store;
use crate::Result;

/// File name of the snapshot inside the cache directory
const SNAPSHOT_FILE: &str = "forecast.json";

/// Snapshot cache with a wall-clock staleness window
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    path: PathBuf,
    max_age: Duration,
}

impl SnapshotCache {
    /// Cache at an explicit snapshot location
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_age,
        }
    }

    /// Cache at the per-user default location
    /// (`<cache dir>/pollenflug/forecast.json`)
    pub fn at_default_location(max_age: Duration) -> Result<Self> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| PollenflugError::cache("no cache directory for this user"))?;
        Ok(Self::new(dir.join("pollenflug").join(SNAPSHOT_FILE), max_age))
    }

    /// Snapshot location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot if it is present, fresh, and holds data.
    ///
    /// Every not-usable condition returns `None`; malformed content is a
    /// warning, not an error.
    #[must_use]
    pub fn load(&self) -> Option<Store> {
        let metadata = fs::metadata(&self.path).ok()?;

        match metadata.modified().ok()?.elapsed() {
            Ok(age) if age > self.max_age => {
                debug!("Cache snapshot expired ({}s old)", age.as_secs());
                return None;
            }
            Ok(_) => {}
            // Snapshot mtime is in the future (clock moved); treat as fresh
            Err(_) => {}
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read cache snapshot {}: {}", self.path.display(), e);
                return None;
            }
        };

        let store: Store = match serde_json::from_str(&content) {
            Ok(store) => store,
            Err(e) => {
                warn!("Malformed cache snapshot {}: {}", self.path.display(), e);
                return None;
            }
        };

        if store.is_empty() {
            debug!("Cache snapshot holds no regions, ignoring");
            return None;
        }

        debug!("Loaded cache snapshot, last update: {:?}", store.last_update);
        Some(store)
    }

    /// Serialize the store to the snapshot location, creating directories as
    /// needed. The caller decides whether a failure matters.
    pub fn save(&self, store: &Store) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(store)
            .map_err(|e| PollenflugError::cache(format!("failed to serialize snapshot: {e}")))?;
        fs::write(&self.path, json)?;
        debug!("Saved cache snapshot to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forecast::RegionForecast;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn populated_store() -> Store {
        let stamp = NaiveDate::from_ymd_opt(2025, 5, 31)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap();
        let region = RegionForecast {
            region_id: 50,
            region_name: "Brandenburg und Berlin".to_string(),
            partregion_id: -1,
            partregion_name: String::new(),
            last_update: stamp,
            next_update: stamp,
            pollen: BTreeMap::new(),
        };
        let mut data = BTreeMap::new();
        data.insert(region.composite_key(), region);
        Store {
            data,
            legend: [("0".to_string(), "keine Belastung".to_string())]
                .into_iter()
                .collect(),
            last_update: Some(stamp),
            next_update: Some(stamp),
        }
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(
            dir.path().join("pollen").join("forecast.json"),
            Duration::from_secs(3600),
        );

        let store = populated_store();
        cache.save(&store).unwrap();

        let loaded = cache.load().expect("fresh snapshot should be usable");
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_load_missing_snapshot() {
        let dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(dir.path().join("forecast.json"), Duration::from_secs(3600));
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_load_stale_snapshot() {
        let dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(dir.path().join("forecast.json"), Duration::ZERO);

        cache.save(&populated_store()).unwrap();
        std::thread::sleep(Duration::from_millis(20));

        assert!(cache.load().is_none(), "zero-age window must report stale");
    }

    #[test]
    fn test_load_malformed_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forecast.json");
        fs::write(&path, "{not json").unwrap();

        let cache = SnapshotCache::new(path, Duration::from_secs(3600));
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_load_empty_store_not_usable() {
        let dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(dir.path().join("forecast.json"), Duration::from_secs(3600));

        cache.save(&Store::default()).unwrap();
        assert!(cache.load().is_none());
    }
}
