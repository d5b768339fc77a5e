//! Forecast building from raw day buckets
//!
//! The report publishes a 3-slot rolling window per allergen whose slots are
//! reinterpreted near weekends: Saturday relabels the `tomorrow` slot onto
//! the current date and Sunday only commits the day-after slot. The schedule
//! is a pure function of the reference date so it stays unit-testable without
//! a client.

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Europe::Berlin;

use crate::error::PollenflugError;
use crate::legend::Legend;
use crate::models::api::DayBuckets;
use crate::models::forecast::{AllergenForecast, ForecastEntry};
use crate::Result;

/// Current civil date at the publisher's own day boundaries (Europe/Berlin)
#[must_use]
pub fn berlin_today() -> NaiveDate {
    Utc::now().with_timezone(&Berlin).date_naive()
}

/// Map calendar dates to the raw codes committed for them.
///
/// Weekday of `reference` (Monday=0 .. Sunday=6) selects which slots apply:
/// - Mon-Thu: today and tomorrow
/// - Fri: today and tomorrow, plus day-after when available
/// - Sat: the `tomorrow` slot relabeled onto `reference`, plus day-after
/// - Sun: day-after only
///
/// Unavailable day-after slots (`"-1"`) are never scheduled.
#[must_use]
pub fn day_schedule(reference: NaiveDate, bucket: &DayBuckets) -> Vec<(NaiveDate, String)> {
    let tomorrow = reference + chrono::Duration::days(1);
    let day_after = reference + chrono::Duration::days(2);

    let mut schedule = Vec::new();
    match reference.weekday().num_days_from_monday() {
        0..=3 => {
            schedule.push((reference, bucket.today.clone()));
            schedule.push((tomorrow, bucket.tomorrow.clone()));
        }
        4 => {
            schedule.push((reference, bucket.today.clone()));
            schedule.push((tomorrow, bucket.tomorrow.clone()));
            if bucket.has_day_after() {
                schedule.push((day_after, bucket.dayafter_to.clone()));
            }
        }
        5 => {
            // The source pre-shifts weekend data: the tomorrow slot already
            // describes the current date.
            schedule.push((reference, bucket.tomorrow.clone()));
            if bucket.has_day_after() {
                schedule.push((day_after, bucket.dayafter_to.clone()));
            }
        }
        _ => {
            if bucket.has_day_after() {
                schedule.push((day_after, bucket.dayafter_to.clone()));
            }
        }
    }
    schedule
}

/// Numeric severity of a raw code: the mean of its hyphen-split integer parts
pub fn decode_value(raw: &str) -> Result<f64> {
    let mut sum = 0i64;
    let mut count = 0u32;
    for part in raw.split('-') {
        let n: i64 = part.parse().map_err(|_| {
            PollenflugError::payload(format!("value code '{raw}' is not numeric"))
        })?;
        sum += n;
        count += 1;
    }
    Ok(sum as f64 / f64::from(count))
}

/// Severity color for a decoded value, inclusive on the lower band edge
#[must_use]
pub fn severity_color(value: f64) -> &'static str {
    if value <= 0.0 {
        "#00FF00" // no load
    } else if value <= 1.0 {
        "#ADFF2F" // low load
    } else if value <= 2.0 {
        "#FFFF00" // medium load
    } else if value <= 2.5 {
        "#FFA500" // medium-high load
    } else {
        "#FF0000" // high load
    }
}

/// Decode one raw code into a dated entry; the legend must contain the code
pub fn build_entry(raw: &str, legend: &Legend) -> Result<ForecastEntry> {
    let human = legend.get(raw).ok_or_else(|| PollenflugError::Legend {
        code: raw.to_string(),
    })?;
    let value = decode_value(raw)?;
    Ok(ForecastEntry {
        value,
        raw: raw.to_string(),
        human: human.clone(),
        color: severity_color(value).to_string(),
    })
}

/// Transform one allergen's day buckets into its dated forecast
pub fn build_allergen_forecast(
    reference: NaiveDate,
    bucket: &DayBuckets,
    legend: &Legend,
) -> Result<AllergenForecast> {
    let mut forecast = AllergenForecast::new();
    for (date, raw) in day_schedule(reference, bucket) {
        forecast.insert(date, build_entry(&raw, legend)?);
    }
    Ok(forecast)
}
