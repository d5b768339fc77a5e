//! In-memory forecast store
//!
//! One update pass rebuilds the whole store from a report payload; callers
//! swap the result in on success and keep their previous store on any
//! failure. The store also carries the legend and the report's update stamps
//! and doubles as the cache snapshot payload (the encoding lives in
//! `crate::cache`).

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::PollenflugError;
use crate::forecast::build_allergen_forecast;
use crate::legend::{build_legend, Legend};
use crate::models::api::ApiPayload;
use crate::models::forecast::RegionForecast;
use crate::Result;

/// Stamp format used by the report for `last_update`/`next_update`
pub const UPDATE_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M Uhr";

/// Parse a report update stamp (`"2025-05-31 11:00 Uhr"`, naive local time)
pub fn parse_update_stamp(stamp: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(stamp, UPDATE_STAMP_FORMAT).map_err(|e| {
        PollenflugError::payload(format!("invalid update stamp '{stamp}': {e}"))
    })
}

/// All region forecasts of one update pass, keyed `"{region_id}-{partregion_id}"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Composite key to region forecast
    pub data: BTreeMap<String, RegionForecast>,
    /// Severity legend loaded with this pass
    pub legend: Legend,
    /// Publication stamp of the loaded report
    pub last_update: Option<NaiveDateTime>,
    /// Announced next publication
    pub next_update: Option<NaiveDateTime>,
}

impl Store {
    /// Composite key for a region/partregion pair
    #[must_use]
    pub fn composite_key(region_id: i64, partregion_id: i64) -> String {
        format!("{region_id}-{partregion_id}")
    }

    /// Build a fresh store from a report payload, anchored at `reference`.
    ///
    /// All-or-nothing: any unparsable stamp, missing legend entry, or bad
    /// value code fails the whole build.
    pub fn from_payload(payload: &ApiPayload, reference: NaiveDate) -> Result<Self> {
        let last_update = parse_update_stamp(&payload.last_update)?;
        let next_update = parse_update_stamp(&payload.next_update)?;
        let legend = build_legend(&payload.legend)?;

        let mut data = BTreeMap::new();
        for region in &payload.content {
            let mut pollen = BTreeMap::new();
            for (allergen, bucket) in &region.pollen {
                let forecast = build_allergen_forecast(reference, bucket, &legend)?;
                pollen.insert(allergen.clone(), forecast);
            }
            let forecast = RegionForecast {
                region_id: region.region_id,
                region_name: region.region_name.clone(),
                partregion_id: region.partregion_id,
                partregion_name: region.partregion_name.clone(),
                last_update,
                next_update,
                pollen,
            };
            data.insert(forecast.composite_key(), forecast);
        }

        debug!("Built store with {} regions from report {}", data.len(), payload.last_update);

        Ok(Self {
            data,
            legend,
            last_update: Some(last_update),
            next_update: Some(next_update),
        })
    }

    /// Whether no update pass has populated this store yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the store holds a forecast for the pair
    #[must_use]
    pub fn contains(&self, region_id: i64, partregion_id: i64) -> bool {
        self.data
            .contains_key(&Self::composite_key(region_id, partregion_id))
    }

    /// Forecast for the pair, if present
    #[must_use]
    pub fn get(&self, region_id: i64, partregion_id: i64) -> Option<&RegionForecast> {
        self.data.get(&Self::composite_key(region_id, partregion_id))
    }

    /// All `(region_id, partregion_id, region_name, partregion_name)` tuples,
    /// sorted ascending by the tuple itself
    #[must_use]
    pub fn region_names(&self) -> Vec<(i64, i64, String, String)> {
        let mut names: Vec<_> = self
            .data
            .values()
            .map(|r| {
                (
                    r.region_id,
                    r.partregion_id,
                    r.region_name.clone(),
                    r.partregion_name.clone(),
                )
            })
            .collect();
        names.sort();
        names
    }

    /// Sorted set-union of allergen names across all regions
    #[must_use]
    pub fn allergen_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .data
            .values()
            .flat_map(|r| r.pollen.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Per-date summary for one region: date to allergen to legend text.
    ///
    /// Allergens without an entry for a date are omitted from that date;
    /// dates ascend by map order.
    #[must_use]
    pub fn summary(
        &self,
        region_id: i64,
        partregion_id: i64,
    ) -> Option<BTreeMap<NaiveDate, BTreeMap<String, String>>> {
        let region = self.get(region_id, partregion_id)?;
        let mut summary: BTreeMap<NaiveDate, BTreeMap<String, String>> = BTreeMap::new();
        for (allergen, forecast) in &region.pollen {
            for (date, entry) in forecast {
                summary
                    .entry(*date)
                    .or_default()
                    .insert(allergen.clone(), entry.human.clone());
            }
        }
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api::{ApiRegion, DayBuckets};
    use std::collections::HashMap;

    fn sample_payload() -> ApiPayload {
        let legend: HashMap<String, String> = [
            ("id1", "0"),
            ("id1_desc", "keine Belastung"),
            ("id3", "1"),
            ("id3_desc", "geringe Belastung"),
            ("id5", "2"),
            ("id5_desc", "mittlere Belastung"),
            ("id7", "3"),
            ("id7_desc", "hohe Belastung"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let buckets = |today: &str, tomorrow: &str, dayafter: &str| DayBuckets {
            today: today.to_string(),
            tomorrow: tomorrow.to_string(),
            dayafter_to: dayafter.to_string(),
        };

        ApiPayload {
            last_update: "2025-05-31 11:00 Uhr".to_string(),
            next_update: "2025-06-01 11:00 Uhr".to_string(),
            legend,
            content: vec![
                ApiRegion {
                    region_id: 50,
                    region_name: "Brandenburg und Berlin".to_string(),
                    partregion_id: -1,
                    partregion_name: String::new(),
                    pollen: [
                        ("Birke".to_string(), buckets("3", "2", "1")),
                        ("Hasel".to_string(), buckets("0", "0", "0")),
                    ]
                    .into_iter()
                    .collect(),
                },
                ApiRegion {
                    region_id: 10,
                    region_name: "Schleswig-Holstein und Hamburg".to_string(),
                    partregion_id: 11,
                    partregion_name: "Inseln und Marschen".to_string(),
                    pollen: [("Birke".to_string(), buckets("1", "1", "-1"))]
                        .into_iter()
                        .collect(),
                },
            ],
        }
    }

    fn reference() -> NaiveDate {
        // A Friday, so every allergen gets up to three dated entries
        NaiveDate::from_ymd_opt(2025, 6, 6).unwrap()
    }

    #[test]
    fn test_parse_update_stamp() {
        let stamp = parse_update_stamp("2025-05-31 11:00 Uhr").unwrap();
        assert_eq!(
            stamp,
            NaiveDate::from_ymd_opt(2025, 5, 31)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap()
        );
        assert!(parse_update_stamp("2025-05-31 11:00").is_err());
    }

    #[test]
    fn test_from_payload_builds_all_regions() {
        let store = Store::from_payload(&sample_payload(), reference()).unwrap();

        assert_eq!(store.data.len(), 2);
        assert!(store.contains(50, -1));
        assert!(store.contains(10, 11));

        let berlin = store.get(50, -1).unwrap();
        assert_eq!(berlin.region_name, "Brandenburg und Berlin");
        assert_eq!(berlin.pollen.len(), 2);
        // Friday commits three days for a bucket with a day-after value
        assert_eq!(berlin.pollen["Birke"].len(), 3);
        // ...and two days when the day-after slot is unavailable
        let frisia = store.get(10, 11).unwrap();
        assert_eq!(frisia.pollen["Birke"].len(), 2);
    }

    #[test]
    fn test_from_payload_shares_update_stamps() {
        let store = Store::from_payload(&sample_payload(), reference()).unwrap();
        let stamps: Vec<_> = store
            .data
            .values()
            .map(|r| (r.last_update, r.next_update))
            .collect();
        assert!(stamps.iter().all(|s| *s == stamps[0]));
        assert_eq!(store.last_update, Some(stamps[0].0));
        assert_eq!(store.next_update, Some(stamps[0].1));
    }

    #[test]
    fn test_from_payload_rejects_bad_stamp() {
        let mut payload = sample_payload();
        payload.last_update = "31.05.2025".to_string();
        assert!(Store::from_payload(&payload, reference()).is_err());
    }

    #[test]
    fn test_from_payload_rejects_unknown_value_code() {
        let mut payload = sample_payload();
        payload
            .content[0]
            .pollen
            .get_mut("Birke")
            .unwrap()
            .today = "7".to_string();
        let err = Store::from_payload(&payload, reference()).unwrap_err();
        assert!(matches!(err, PollenflugError::Legend { .. }));
    }

    #[test]
    fn test_region_names_sorted() {
        let store = Store::from_payload(&sample_payload(), reference()).unwrap();
        let names = store.region_names();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0].0, 10);
        assert_eq!(names[1].0, 50);
        assert_eq!(names[0].3, "Inseln und Marschen");
    }

    #[test]
    fn test_allergen_names_deduplicated() {
        let store = Store::from_payload(&sample_payload(), reference()).unwrap();
        assert_eq!(store.allergen_names(), vec!["Birke", "Hasel"]);
    }

    #[test]
    fn test_summary_omits_missing_dates() {
        let store = Store::from_payload(&sample_payload(), reference()).unwrap();
        let summary = store.summary(50, -1).unwrap();

        // Friday reference: today, tomorrow, day-after all present for Birke
        assert_eq!(summary.len(), 3);
        let day_after = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();
        assert_eq!(summary[&day_after]["Birke"], "geringe Belastung");
        assert_eq!(summary[&day_after]["Hasel"], "keine Belastung");

        assert!(store.summary(99, -1).is_none());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let store = Store::from_payload(&sample_payload(), reference()).unwrap();
        let json = serde_json::to_string_pretty(&store).unwrap();
        let back: Store = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }
}
