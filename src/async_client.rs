//! Async client for the DWD pollen load forecast
//!
//! Same orchestration as [`crate::client::PollenApi`] with two differences:
//! the fetch is a single attempt without a retry loop, and construction can
//! launch the first update as a detached task. Read operations join that
//! task exactly once: the handle is taken before awaiting, so a second read
//! never re-awaits a finished update.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::task::{self, JoinHandle};
use tracing::{info, warn};

use crate::api::{AsyncHttpPollenSource, AsyncPollenSource};
use crate::cache::SnapshotCache;
use crate::config::ClientOptions;
use crate::error::PollenflugError;
use crate::forecast::berlin_today;
use crate::models::forecast::{AllergenForecast, RegionForecast};
use crate::store::Store;
use crate::Result;

/// Async API client for the current pollen load in Germany
pub struct AsyncPollenApi {
    store: Store,
    cache: SnapshotCache,
    source: Arc<dyn AsyncPollenSource>,
    init: Option<JoinHandle<Result<Store>>>,
}

impl AsyncPollenApi {
    /// Client over the real DWD endpoint.
    ///
    /// With `auto_update` the first update runs as a detached task; callers
    /// must be inside a Tokio runtime.
    pub fn new(options: ClientOptions, auto_update: bool) -> Result<Self> {
        let source = AsyncHttpPollenSource::new(options.url.clone(), options.timeout)?;
        Self::with_source(Arc::new(source), options, auto_update)
    }

    /// Client over an arbitrary payload source
    pub fn with_source(
        source: Arc<dyn AsyncPollenSource>,
        options: ClientOptions,
        auto_update: bool,
    ) -> Result<Self> {
        let cache = match options.cache_path {
            Some(path) => SnapshotCache::new(path, options.cache_duration),
            None => SnapshotCache::at_default_location(options.cache_duration)?,
        };

        let init = if auto_update {
            let source = source.clone();
            let cache = cache.clone();
            Some(tokio::spawn(async move {
                run_update(source, cache, false).await
            }))
        } else {
            None
        };

        Ok(Self {
            store: Store::default(),
            cache,
            source,
            init,
        })
    }

    /// Join the detached initial update, exactly once.
    ///
    /// The handle is taken before awaiting; after the first join this is a
    /// no-op regardless of the update's outcome.
    async fn join_initial_update(&mut self) -> Result<()> {
        if let Some(handle) = self.init.take() {
            match handle.await {
                Ok(Ok(store)) => {
                    info!("Adopted initial update: {} regions", store.data.len());
                    self.store = store;
                }
                Ok(Err(e)) => return Err(e),
                Err(e) => {
                    return Err(PollenflugError::transport(format!(
                        "initial update task failed: {e}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Update all pollen data.
    ///
    /// Without `force`, a usable cache snapshot is adopted without touching
    /// the network. The fetch is a single attempt; on any failure the
    /// previous store is kept.
    pub async fn update(&mut self, force: bool) -> Result<()> {
        let store = run_update(self.source.clone(), self.cache.clone(), force).await?;
        self.store = store;
        Ok(())
    }

    /// Pollen load of the requested region and partregion.
    ///
    /// An absent key triggers exactly one forced update before the lookup is
    /// retried; a key still absent afterwards is a not-found error.
    pub async fn get_pollen(
        &mut self,
        region_id: i64,
        partregion_id: i64,
    ) -> Result<&RegionForecast> {
        self.join_initial_update().await?;

        if !self.store.contains(region_id, partregion_id) {
            if let Err(e) = self.update(true).await {
                warn!("Forced update for missing region failed: {}", e);
            }
        }
        self.store
            .get(region_id, partregion_id)
            .ok_or(PollenflugError::RegionNotFound {
                region_id,
                partregion_id,
            })
    }

    /// All regions currently held, as sorted
    /// `(region_id, partregion_id, region_name, partregion_name)` tuples
    pub async fn get_region_names(&mut self) -> Result<Vec<(i64, i64, String, String)>> {
        self.join_initial_update().await?;
        Ok(self.store.region_names())
    }

    /// Sorted set-union of allergen names across all regions
    pub async fn get_allergen_names(&mut self) -> Result<Vec<String>> {
        self.join_initial_update().await?;
        Ok(self.store.allergen_names())
    }

    /// One allergen's dated forecast for a region
    pub async fn get_allergen_for_region(
        &mut self,
        region_id: i64,
        partregion_id: i64,
        allergen: &str,
    ) -> Result<&AllergenForecast> {
        let region = self.get_pollen(region_id, partregion_id).await?;
        region
            .pollen
            .get(allergen)
            .ok_or_else(|| PollenflugError::AllergenNotFound {
                region_id,
                partregion_id,
                allergen: allergen.to_string(),
            })
    }

    /// Per-date summary for a region: date to allergen to legend text
    pub async fn get_forecast_summary(
        &mut self,
        region_id: i64,
        partregion_id: i64,
    ) -> Result<std::collections::BTreeMap<NaiveDate, std::collections::BTreeMap<String, String>>>
    {
        self.get_pollen(region_id, partregion_id).await?;
        self.store
            .summary(region_id, partregion_id)
            .ok_or(PollenflugError::RegionNotFound {
                region_id,
                partregion_id,
            })
    }

    /// Read access to the underlying store
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

/// One update pass, shared by explicit updates and the detached initial one.
///
/// Returns the store to adopt: a usable cache snapshot unless `force`,
/// otherwise a fresh rebuild from a single fetch attempt. File I/O runs on
/// the blocking pool.
async fn run_update(
    source: Arc<dyn AsyncPollenSource>,
    cache: SnapshotCache,
    force: bool,
) -> Result<Store> {
    if !force {
        let loader = cache.clone();
        let cached = match task::spawn_blocking(move || loader.load()).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Cache load task failed: {}", e);
                None
            }
        };
        if let Some(store) = cached {
            info!("Adopted cache snapshot, last update: {:?}", store.last_update);
            return Ok(store);
        }
    }

    let payload = source.fetch().await?;
    let store = Store::from_payload(&payload, berlin_today())?;

    let saved = store.clone();
    let save_result = task::spawn_blocking(move || cache.save(&saved)).await;
    match save_result {
        Ok(Err(e)) => warn!("Failed to save cache snapshot: {}", e),
        Err(e) => warn!("Cache save task failed: {}", e),
        Ok(Ok(())) => {}
    }

    info!(
        "Updated pollen data: {} regions, last update {:?}",
        store.data.len(),
        store.last_update
    );
    Ok(store)
}
