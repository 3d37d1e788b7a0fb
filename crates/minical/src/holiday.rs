//! Holiday model, country table, and the fetch/cache pipeline.

pub mod api;
pub mod cache;
pub mod service;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One holiday event from the calendar source.
///
/// `id` is the provider-assigned event identifier. It is stable per
/// source event and unique within one country/year fetch, but not
/// globally — the day-key index, not the id, is the lookup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: String,
    /// Day granularity, local time zone (serialized as `yyyy-MM-dd`).
    pub date: NaiveDate,
    /// Display label, localized by the source.
    pub name: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
}

/// Persisted cache unit: one record per (country, year) pair.
///
/// `fetched_at` is informational only; records never expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayCacheRecord {
    #[serde(rename = "countryCode")]
    pub country_code: String,
    pub year: i32,
    #[serde(rename = "fetchedAt")]
    pub fetched_at: DateTime<Utc>,
    pub holidays: Vec<Holiday>,
}

/// Supported country codes with display names. Closed set; anything else
/// falls back to KR's calendar source but is stored under its own code.
pub const SUPPORTED_COUNTRIES: [(&str, &str); 5] = [
    ("KR", "한국"),
    ("US", "United States"),
    ("JP", "Japan"),
    ("CN", "China"),
    ("GB", "United Kingdom"),
];

pub fn is_supported(country_code: &str) -> bool {
    SUPPORTED_COUNTRIES.iter().any(|(code, _)| *code == country_code)
}

/// Google Calendar id for a country's public holiday calendar.
pub fn calendar_id(country_code: &str) -> &'static str {
    match country_code {
        "KR" => "ko.south_korea#holiday@group.v.calendar.google.com",
        "US" => "en.usa#holiday@group.v.calendar.google.com",
        "JP" => "ja.japanese#holiday@group.v.calendar.google.com",
        "CN" => "zh.china#holiday@group.v.calendar.google.com",
        "GB" => "en.uk#holiday@group.v.calendar.google.com",
        _ => "ko.south_korea#holiday@group.v.calendar.google.com",
    }
}

/// Display-language hint for the source (Korean for KR, English otherwise).
pub fn language_code(country_code: &str) -> &'static str {
    if country_code == "KR" {
        "ko"
    } else {
        "en"
    }
}

/// Cache/fetch unit key: `{country}_{year}`. The filename convention is
/// load-bearing for the prefix-based delete-all-for-country operation.
pub fn holiday_key(country_code: &str, year: i32) -> String {
    format!("{country_code}_{year}")
}

/// Index key for one local calendar day: `yyyy-MM-dd`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
