//! Caching layer for prayer time responses.
//!
//! A day's times for a given place never change, so successful schedules
//! are cached per (date, coordinates, language). The TTL only bounds how
//! long a provider correction takes to show up. Failures are never cached,
//! so the next request retries the provider.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::aladhan::{PrayerClient, PrayerError};
use crate::cities::City;
use crate::domain::{Language, Schedule};

/// Cache key: (date, latitude bits, longitude bits, language).
///
/// Coordinates are keyed by their bit pattern since `f64` is not `Hash`.
type ScheduleKey = (NaiveDate, u64, u64, Language);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(6 * 60 * 60),
            max_capacity: 1000,
        }
    }
}

fn schedule_key(date: NaiveDate, latitude: f64, longitude: f64, language: Language) -> ScheduleKey {
    (date, latitude.to_bits(), longitude.to_bits(), language)
}

/// Prayer client with caching.
///
/// Wraps a `PrayerClient` and caches successful schedules.
pub struct CachedPrayerClient {
    client: PrayerClient,
    schedules: MokaCache<ScheduleKey, Arc<Schedule>>,
}

impl CachedPrayerClient {
    /// Create a new cached client.
    pub fn new(client: PrayerClient, config: &CacheConfig) -> Self {
        let schedules = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { client, schedules }
    }

    /// Fetch a schedule, using the cache if available.
    pub async fn fetch_prayer_times(
        &self,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        language: Language,
    ) -> Result<Arc<Schedule>, PrayerError> {
        let key = schedule_key(date, latitude, longitude, language);

        if let Some(cached) = self.schedules.get(&key).await {
            debug!(%date, latitude, longitude, "prayer times served from cache");
            return Ok(cached);
        }

        let schedule = self
            .client
            .fetch_prayer_times(date, latitude, longitude, language)
            .await?;
        let entry = Arc::new(schedule);

        self.schedules.insert(key, entry.clone()).await;

        Ok(entry)
    }

    /// Fetch a schedule for a directory city.
    pub async fn fetch_for_city(
        &self,
        date: NaiveDate,
        city: &City,
        language: Language,
    ) -> Result<Arc<Schedule>, PrayerError> {
        self.fetch_prayer_times(date, city.latitude, city.longitude, language)
            .await
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &PrayerClient {
        &self.client
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.schedules.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.schedules.invalidate_all();
    }
}
