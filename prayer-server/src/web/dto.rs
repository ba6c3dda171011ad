//! Data transfer objects for the web API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cities::City;
use crate::domain::{Language, PrayerTime};
use crate::schedule::ScheduleSource;

// ============================================================================
// Request types
// ============================================================================

/// Query for the day's prayer times.
#[derive(Debug, Default, Deserialize)]
pub struct PrayerTimesQuery {
    /// Date as YYYY-MM-DD (defaults to today)
    pub date: Option<String>,
    /// City key or name (defaults to the first directory entry)
    pub city: Option<String>,
    /// Language code (`id` or `en`, defaults to `id`)
    pub lang: Option<String>,
}

/// Query for the static fallback schedule.
#[derive(Debug, Default, Deserialize)]
pub struct FallbackQuery {
    pub date: Option<String>,
    pub lang: Option<String>,
}

// ============================================================================
// Response types
// ============================================================================

/// A city in API responses.
#[derive(Debug, Serialize)]
pub struct CityResult {
    pub key: String,
    pub local_name: &'static str,
    pub english_name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityResult {
    pub fn from_city(city: &City) -> Self {
        Self {
            key: city.key(),
            local_name: city.local_name,
            english_name: city.english_name,
            latitude: city.latitude,
            longitude: city.longitude,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CitiesResponse {
    pub cities: Vec<CityResult>,
}

/// The city part of a prayer times response.
#[derive(Debug, Serialize)]
pub struct ScheduleCity {
    pub key: String,
    /// Name in the requested language
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl ScheduleCity {
    pub fn new(city: &City, language: Language) -> Self {
        Self {
            key: city.key(),
            name: city.name(language),
            latitude: city.latitude,
            longitude: city.longitude,
        }
    }
}

/// Response for the day's prayer times.
#[derive(Debug, Serialize)]
pub struct PrayerTimesResponse {
    pub city: ScheduleCity,
    pub date: NaiveDate,
    pub language: Language,
    pub source: ScheduleSource,
    /// Entry within 30 minutes of now, only for today's schedule
    pub current: Option<PrayerTime>,
    /// Provider failure behind a fallback schedule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub prayers: Vec<PrayerTime>,
}

#[derive(Debug, Serialize)]
pub struct FallbackResponse {
    pub date: NaiveDate,
    pub language: Language,
    pub prayers: Vec<PrayerTime>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
