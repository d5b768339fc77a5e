//! Data models for the `pollenflug` crate
//!
//! This module contains the data structures organized by concern:
//! - Api: the raw report shape published by the DWD open data endpoint
//! - Forecast: the calendar-dated, human-annotated forecast served to callers

pub mod api;
pub mod forecast;

// Re-export all public types for convenient access
pub use api::{ApiPayload, ApiRegion, DayBuckets};
pub use forecast::{AllergenForecast, ForecastEntry, RegionForecast};
