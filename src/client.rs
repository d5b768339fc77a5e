//! Blocking client for the DWD pollen load forecast
//!
//! Owns the forecast store exclusively and serializes updates and reads on
//! the caller's thread. An update adopts a fresh cache snapshot when one is
//! usable, otherwise fetches with a fixed-delay retry loop and rebuilds the
//! store all-or-nothing.

use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::api::{HttpPollenSource, PollenSource};
use crate::cache::SnapshotCache;
use crate::config::ClientOptions;
use crate::error::PollenflugError;
use crate::forecast::berlin_today;
use crate::models::api::ApiPayload;
use crate::models::forecast::{AllergenForecast, RegionForecast};
use crate::store::Store;
use crate::Result;

/// Blocking API client for the current pollen load in Germany
pub struct PollenApi {
    store: Store,
    cache: SnapshotCache,
    source: Box<dyn PollenSource>,
    retry_count: u32,
    retry_delay: Duration,
}

impl PollenApi {
    /// Client over the real DWD endpoint
    pub fn new(options: ClientOptions) -> Result<Self> {
        let source = HttpPollenSource::new(options.url.clone(), options.timeout)?;
        Self::with_source(Box::new(source), options)
    }

    /// Client over an arbitrary payload source
    pub fn with_source(source: Box<dyn PollenSource>, options: ClientOptions) -> Result<Self> {
        let cache = match options.cache_path {
            Some(path) => SnapshotCache::new(path, options.cache_duration),
            None => SnapshotCache::at_default_location(options.cache_duration)?,
        };
        Ok(Self {
            store: Store::default(),
            cache,
            source,
            retry_count: options.retry_count.max(1),
            retry_delay: options.retry_delay,
        })
    }

    /// Update all pollen data.
    ///
    /// Without `force`, a usable cache snapshot is adopted and the network is
    /// never touched. Otherwise the report is fetched with the retry policy
    /// and the store rebuilt; on any failure the previous store is kept.
    pub fn update(&mut self, force: bool) -> Result<()> {
        if !force {
            if let Some(store) = self.cache.load() {
                info!("Adopted cache snapshot, last update: {:?}", store.last_update);
                self.store = store;
                return Ok(());
            }
        }

        let payload = self.fetch_with_retry()?;
        let store = Store::from_payload(&payload, berlin_today())?;

        if let Err(e) = self.cache.save(&store) {
            warn!("Failed to save cache snapshot: {}", e);
        }

        info!(
            "Updated pollen data: {} regions, last update {:?}",
            store.data.len(),
            store.last_update
        );
        self.store = store;
        Ok(())
    }

    /// Fetch the report, retrying on failure with a fixed delay.
    ///
    /// Exhausting all attempts surfaces one aggregated transport error.
    fn fetch_with_retry(&self) -> Result<ApiPayload> {
        let mut last_error = None;
        for attempt in 1..=self.retry_count {
            match self.source.fetch() {
                Ok(payload) => return Ok(payload),
                Err(e) => {
                    warn!("Request attempt {} failed: {}", attempt, e);
                    last_error = Some(e);
                    if attempt < self.retry_count {
                        thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        let mut message = format!("Failed to fetch data after {} attempts", self.retry_count);
        if let Some(e) = last_error {
            message.push_str(&format!(": {e}"));
        }
        Err(PollenflugError::transport(message))
    }

    /// Pollen load of the requested region and partregion.
    ///
    /// An absent key triggers exactly one forced update before the lookup is
    /// retried; a key still absent afterwards is a not-found error, never an
    /// empty result.
    pub fn get_pollen(&mut self, region_id: i64, partregion_id: i64) -> Result<&RegionForecast> {
        if !self.store.contains(region_id, partregion_id) {
            if let Err(e) = self.update(true) {
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
    #[must_use]
    pub fn get_region_names(&self) -> Vec<(i64, i64, String, String)> {
        self.store.region_names()
    }

    /// Sorted set-union of allergen names across all regions
    #[must_use]
    pub fn get_allergen_names(&self) -> Vec<String> {
        self.store.allergen_names()
    }

    /// One allergen's dated forecast for a region
    pub fn get_allergen_for_region(
        &mut self,
        region_id: i64,
        partregion_id: i64,
        allergen: &str,
    ) -> Result<&AllergenForecast> {
        let region = self.get_pollen(region_id, partregion_id)?;
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
    pub fn get_forecast_summary(
        &mut self,
        region_id: i64,
        partregion_id: i64,
    ) -> Result<std::collections::BTreeMap<NaiveDate, std::collections::BTreeMap<String, String>>>
    {
        self.get_pollen(region_id, partregion_id)?;
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
