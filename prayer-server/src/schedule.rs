//! Schedule resolution: provider first, static table on failure.
//!
//! Callers always get six entries back. When the provider fails the
//! fallback schedule is returned together with the error message so the
//! caller can surface or log it.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::cache::CachedPrayerClient;
use crate::cities::City;
use crate::domain::{Language, Schedule};
use crate::fallback::fallback_times;

/// Where a resolved schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleSource {
    Provider,
    Fallback,
}

/// A schedule plus its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedSchedule {
    pub schedule: Arc<Schedule>,
    pub source: ScheduleSource,
    /// Provider failure that caused the fallback, if any.
    pub error: Option<String>,
}

impl ResolvedSchedule {
    pub fn is_fallback(&self) -> bool {
        self.source == ScheduleSource::Fallback
    }
}

/// Resolve the day's schedule for a city.
///
/// Never fails: provider errors are logged and replaced by the fallback table.
pub async fn resolve_schedule(
    client: &CachedPrayerClient,
    date: NaiveDate,
    city: &City,
    language: Language,
) -> ResolvedSchedule {
    match client.fetch_for_city(date, city, language).await {
        Ok(schedule) => ResolvedSchedule {
            schedule,
            source: ScheduleSource::Provider,
            error: None,
        },
        Err(e) => {
            warn!(%date, city = city.english_name, error = %e, "using fallback prayer times");
            ResolvedSchedule {
                schedule: Arc::new(fallback_times(date, language)),
                source: ScheduleSource::Fallback,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::aladhan::{PrayerClient, PrayerClientConfig};
    use crate::cache::CacheConfig;
    use crate::cities::default_city;
    use crate::transport::{MockReply, MockTransport};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 23).unwrap()
    }

    fn client(mock: MockTransport) -> CachedPrayerClient {
        let config = PrayerClientConfig::new().with_backoff_step(Duration::ZERO);
        let client = PrayerClient::with_transport(config, Arc::new(mock));
        CachedPrayerClient::new(client, &CacheConfig::default())
    }

    #[tokio::test]
    async fn provider_success() {
        let body = serde_json::json!({
            "code": 200,
            "status": "OK",
            "data": { "timings": {
                "Fajr": "04:21", "Sunrise": "05:38", "Dhuhr": "11:55", "Asr": "15:21",
                "Maghrib": "18:12", "Isha": "19:27"
            }}
        });
        let client = client(MockTransport::always(MockReply::json(200, &body)));

        let resolved = resolve_schedule(&client, date(), default_city(), Language::Local).await;

        assert_eq!(resolved.source, ScheduleSource::Provider);
        assert!(resolved.error.is_none());
        assert_eq!(resolved.schedule[0].time.to_string(), "04:21");
    }

    #[tokio::test]
    async fn network_failure_falls_back() {
        let client = client(MockTransport::always(MockReply::fail("offline")));

        let resolved = resolve_schedule(&client, date(), default_city(), Language::English).await;

        assert!(resolved.is_fallback());
        assert!(resolved.error.as_deref().unwrap().contains("all attempts failed"));
        assert_eq!(*resolved.schedule, fallback_times(date(), Language::English));
    }

    #[tokio::test]
    async fn http_error_falls_back_with_status() {
        let client = client(MockTransport::always(MockReply::text(500, "down")));

        let resolved = resolve_schedule(&client, date(), default_city(), Language::Local).await;

        assert!(resolved.is_fallback());
        assert!(resolved.error.as_deref().unwrap().contains("500"));
        assert_eq!(resolved.schedule[0].name, "Subuh");
        assert_eq!(resolved.schedule[0].time.to_string(), "04:30");
    }

    #[test]
    fn source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ScheduleSource::Fallback).unwrap(),
            "\"fallback\""
        );
    }
}
