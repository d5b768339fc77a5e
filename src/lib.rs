//! `pollenflug` - client for the Deutscher Wetterdienst pollen load forecast
//!
//! This library fetches the daily pollen load report published by the DWD,
//! reshapes it into a per-date, per-allergen forecast keyed by region, and
//! serves it through a blocking client, an async client, and the
//! `pollenflug` CLI binary. A local snapshot cache avoids refetching within
//! a configurable window.

pub mod api;
pub mod async_client;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod forecast;
pub mod legend;
pub mod models;
pub mod regions;
pub mod store;

// Re-export core types for public API
pub use api::{AsyncHttpPollenSource, AsyncPollenSource, HttpPollenSource, PollenSource};
pub use async_client::AsyncPollenApi;
pub use cache::SnapshotCache;
pub use client::PollenApi;
pub use config::{ClientOptions, DWD_URL};
pub use error::PollenflugError;
pub use legend::{build_legend, Legend};
pub use models::{AllergenForecast, ApiPayload, DayBuckets, ForecastEntry, RegionForecast};
pub use regions::{region_catalog, RegionListing, ALLERGENS, REGIONS};
pub use store::Store;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PollenflugError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
