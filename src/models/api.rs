//! Wire types for the DWD pollen load report
//!
//! Field names follow the published JSON document; the only rename is the
//! capitalized `Pollen` object on each region entry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete report as served by the DWD endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPayload {
    /// Publication stamp, format `"YYYY-MM-DD HH:MM Uhr"`
    pub last_update: String,
    /// Announced next publication, same format
    pub next_update: String,
    /// Flat code/`*_desc` pairs describing the severity scale
    pub legend: HashMap<String, String>,
    /// One entry per forecast region
    pub content: Vec<ApiRegion>,
}

/// Raw per-region entry of the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRegion {
    pub region_id: i64,
    pub region_name: String,
    pub partregion_id: i64,
    pub partregion_name: String,
    /// Allergen name to its three relative day buckets
    #[serde(rename = "Pollen")]
    pub pollen: HashMap<String, DayBuckets>,
}

/// The publisher's three relative-day raw codes for one allergen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayBuckets {
    pub today: String,
    pub tomorrow: String,
    /// `"-1"` means the day-after value is not yet available
    pub dayafter_to: String,
}

/// Sentinel marking a day-after bucket the source has not committed yet
pub const UNAVAILABLE: &str = "-1";

impl DayBuckets {
    /// Whether the day-after slot carries committed data
    #[must_use]
    pub fn has_day_after(&self) -> bool {
        self.dayafter_to != UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_parses_published_shape() {
        let raw = r#"{
            "last_update": "2025-05-31 11:00 Uhr",
            "next_update": "2025-06-01 11:00 Uhr",
            "legend": {"id1": "0", "id1_desc": "keine Belastung"},
            "content": [{
                "region_id": 50,
                "region_name": "Brandenburg und Berlin",
                "partregion_id": -1,
                "partregion_name": "",
                "Pollen": {
                    "Birke": {"today": "3", "tomorrow": "2", "dayafter_to": "-1"}
                }
            }]
        }"#;

        let payload: ApiPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.content.len(), 1);
        let region = &payload.content[0];
        assert_eq!(region.region_id, 50);
        assert_eq!(region.partregion_id, -1);
        let birch = &region.pollen["Birke"];
        assert_eq!(birch.today, "3");
        assert!(!birch.has_day_after());
    }
}
