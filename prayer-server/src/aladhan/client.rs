//! Aladhan prayer times HTTP client.
//!
//! Builds the timings URL, sends it through the request strategy and turns
//! the provider's response into a localized six-entry `Schedule`. Failures
//! are returned to the caller; falling back to static times is the caller's
//! decision.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::cities::City;
use crate::domain::{Language, Schedule};
use crate::transport::{
    DEFAULT_BACKOFF_STEP, DEFAULT_ORIGIN, DEFAULT_RELAYS, HttpTransport, RequestStrategy,
    Transport,
};

use super::convert::convert_timings;
use super::error::PrayerError;
use super::types::{Envelope, TimingsData};

/// Default base URL for the Aladhan API.
const DEFAULT_BASE_URL: &str = "https://api.aladhan.com";

/// Calculation method 8 (Gulf Region), as used by the mosque's site.
const DEFAULT_METHOD: u8 = 8;

/// Maximum number of body characters kept in parse errors.
const BODY_EXCERPT_CHARS: usize = 500;

/// Configuration for the prayer time client.
#[derive(Debug, Clone)]
pub struct PrayerClientConfig {
    /// Base URL for the API (defaults to production Aladhan)
    pub base_url: String,
    /// Calculation method identifier
    pub method: u8,
    /// Relay prefixes tried after the direct attempts
    pub relays: Vec<String>,
    /// Origin header sent to relays
    pub origin: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Linear backoff step between attempts
    pub backoff_step: Duration,
}

impl PrayerClientConfig {
    /// Create a config with production defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            method: DEFAULT_METHOD,
            relays: DEFAULT_RELAYS.iter().map(|r| r.to_string()).collect(),
            origin: DEFAULT_ORIGIN.to_string(),
            timeout_secs: 30,
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the calculation method.
    pub fn with_method(mut self, method: u8) -> Self {
        self.method = method;
        self
    }

    /// Replace the relay list.
    pub fn with_relays(mut self, relays: Vec<String>) -> Self {
        self.relays = relays;
        self
    }

    /// Set the Origin header sent to relays.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the backoff step between attempts.
    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    fn strategy(&self) -> RequestStrategy {
        RequestStrategy::new(self.relays.clone(), self.origin.clone())
            .with_backoff_step(self.backoff_step)
    }
}

impl Default for PrayerClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Prayer time API client.
#[derive(Clone)]
pub struct PrayerClient {
    transport: Arc<dyn Transport>,
    strategy: RequestStrategy,
    base_url: String,
    method: u8,
}

impl PrayerClient {
    /// Create a client that talks HTTP with `reqwest`.
    pub fn new(config: PrayerClientConfig) -> Result<Self, PrayerError> {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over any transport (mocks, alternative stacks).
    pub fn with_transport(config: PrayerClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            strategy: config.strategy(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            method: config.method,
        }
    }

    /// The request strategy in use.
    pub fn strategy(&self) -> &RequestStrategy {
        &self.strategy
    }

    /// Provider URL for one day at a coordinate pair.
    pub fn timings_url(&self, date: NaiveDate, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/v1/timings/{}?latitude={}&longitude={}&method={}",
            self.base_url,
            date.format("%Y-%m-%d"),
            latitude,
            longitude,
            self.method
        )
    }

    /// Fetch the day's schedule for a coordinate pair.
    ///
    /// Times are passed through as the provider reports them; no timezone
    /// conversion is applied.
    pub async fn fetch_prayer_times(
        &self,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        language: Language,
    ) -> Result<Schedule, PrayerError> {
        let url = self.timings_url(date, latitude, longitude);
        let result = self.fetch_url(&url, date, language).await;

        if let Err(e) = &result {
            warn!(%date, latitude, longitude, error = %e, "failed to fetch prayer times");
        }
        result
    }

    /// Fetch the day's schedule for a directory city.
    pub async fn fetch_for_city(
        &self,
        date: NaiveDate,
        city: &City,
        language: Language,
    ) -> Result<Schedule, PrayerError> {
        self.fetch_prayer_times(date, city.latitude, city.longitude, language)
            .await
    }

    async fn fetch_url(
        &self,
        url: &str,
        date: NaiveDate,
        language: Language,
    ) -> Result<Schedule, PrayerError> {
        let response = self
            .strategy
            .attempt_request(self.transport.as_ref(), url)
            .await?;

        if !response.is_success() {
            return Err(PrayerError::Http {
                status: response.status,
                status_text: response.status_text,
            });
        }

        let envelope: Envelope =
            serde_json::from_str(&response.body).map_err(|e| PrayerError::Json {
                message: e.to_string(),
                body: Some(response.body.chars().take(BODY_EXCERPT_CHARS).collect()),
            })?;

        if envelope.code != 200 {
            let status = if envelope.status.is_empty() {
                "API returned error".to_string()
            } else {
                envelope.status
            };
            return Err(PrayerError::Provider {
                code: envelope.code,
                status,
            });
        }

        let data: TimingsData =
            serde_json::from_value(envelope.data).map_err(|e| PrayerError::Json {
                message: e.to_string(),
                body: None,
            })?;

        let timings = convert_timings(&data.timings)?;
        debug!(
            %date,
            readable = data.date.as_ref().map(|d| d.readable.as_str()).unwrap_or_default(),
            "parsed prayer timings"
        );

        Ok(Schedule::localized(date, language, &timings))
    }
}

impl std::fmt::Debug for PrayerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrayerClient")
            .field("strategy", &self.strategy)
            .field("base_url", &self.base_url)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 23).unwrap()
    }

    #[test]
    fn config_builder() {
        let config = PrayerClientConfig::new()
            .with_base_url("http://localhost:8080")
            .with_method(11)
            .with_relays(vec!["http://relay.test/".into()])
            .with_origin("https://mosque.test")
            .with_timeout(5)
            .with_backoff_step(Duration::from_millis(10));

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.method, 11);
        assert_eq!(config.relays, vec!["http://relay.test/".to_string()]);
        assert_eq!(config.origin, "https://mosque.test");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.backoff_step, Duration::from_millis(10));
    }

    #[test]
    fn config_defaults() {
        let config = PrayerClientConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.method, 8);
        assert_eq!(config.relays.len(), 4);
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.backoff_step, Duration::from_secs(1));
    }

    #[test]
    fn client_creation() {
        let client = PrayerClient::new(PrayerClientConfig::new()).unwrap();
        assert_eq!(client.strategy().max_attempts(), 6);
    }

    #[test]
    fn timings_url_format() {
        let client = PrayerClient::new(PrayerClientConfig::new()).unwrap();
        assert_eq!(
            client.timings_url(date(), -6.1754, 106.8272),
            "https://api.aladhan.com/v1/timings/2025-01-23?latitude=-6.1754&longitude=106.8272&method=8"
        );
    }

    #[test]
    fn timings_url_trims_trailing_slash() {
        let config = PrayerClientConfig::new().with_base_url("http://127.0.0.1:9000/");
        let client = PrayerClient::new(config).unwrap();
        assert!(
            client
                .timings_url(date(), 3.5952, 98.6722)
                .starts_with("http://127.0.0.1:9000/v1/timings/2025-01-23?latitude=3.5952")
        );
    }
}
