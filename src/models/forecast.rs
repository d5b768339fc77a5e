//! Domain models for the reshaped pollen forecast

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One decoded severity reading for a single calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Arithmetic mean of the hyphen-split integer parts of `raw`
    pub value: f64,
    /// Value code as published, e.g. `"1-2"`
    pub raw: String,
    /// Legend description for `raw`
    pub human: String,
    /// Severity color, `#RRGGBB`
    pub color: String,
}

/// Date-ordered forecast for one allergen (0-3 entries depending on weekday)
pub type AllergenForecast = BTreeMap<NaiveDate, ForecastEntry>;

/// Full forecast for one region/partregion unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionForecast {
    pub region_id: i64,
    pub region_name: String,
    pub partregion_id: i64,
    pub partregion_name: String,
    /// Publication stamp of the report this forecast was built from
    pub last_update: NaiveDateTime,
    /// Announced next publication
    pub next_update: NaiveDateTime,
    /// Allergen name to its dated forecast
    pub pollen: BTreeMap<String, AllergenForecast>,
}

impl RegionForecast {
    /// Composite key identifying this forecast unit
    #[must_use]
    pub fn composite_key(&self) -> String {
        format!("{}-{}", self.region_id, self.partregion_id)
    }
}
