//! Server configuration from environment variables.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::aladhan::PrayerClientConfig;
use crate::cache::CacheConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {message}")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub client: PrayerClientConfig,
    pub cache: CacheConfig,
    /// Snapshot file for the monitor; `None` keeps it in memory.
    pub monitoring_store: Option<PathBuf>,
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars { lookup };
        let mut client = PrayerClientConfig::new();
        let mut cache = CacheConfig::default();

        let bind_addr = vars.parse_or("PRAYER_BIND_ADDR", DEFAULT_BIND_ADDR)?;

        if let Some(url) = vars.get("ALADHAN_BASE_URL") {
            client = client.with_base_url(url);
        }
        if let Some(method) = vars.parse::<u8>("ALADHAN_METHOD")? {
            client = client.with_method(method);
        }
        if let Some(origin) = vars.get("PRAYER_ORIGIN") {
            client = client.with_origin(origin);
        }
        if let Some(relays) = vars.get("PRAYER_RELAYS") {
            client = client.with_relays(
                relays
                    .split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
        if let Some(secs) = vars.parse::<u64>("PRAYER_TIMEOUT_SECS")? {
            client = client.with_timeout(secs);
        }
        if let Some(ms) = vars.parse::<u64>("PRAYER_BACKOFF_MS")? {
            client = client.with_backoff_step(Duration::from_millis(ms));
        }
        if let Some(secs) = vars.parse::<u64>("PRAYER_CACHE_TTL_SECS")? {
            cache = cache.with_ttl(Duration::from_secs(secs));
        }

        let monitoring_store = vars.get("MONITORING_STORE").map(PathBuf::from);

        Ok(Self {
            bind_addr,
            client,
            cache,
            monitoring_store,
        })
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn get(&self, key: &'static str) -> Option<String> {
        let value = (self.lookup)(key);
        if value.is_none() {
            info!(key, "not set, using default");
        }
        value
    }

    fn parse<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError>
    where
        T::Err: Display,
    {
        self.get(key)
            .map(|value| {
                value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                    key,
                    message: e.to_string(),
                    value,
                })
            })
            .transpose()
    }

    fn parse_or<T: FromStr>(&self, key: &'static str, default: &str) -> Result<T, ConfigError>
    where
        T::Err: Display,
    {
        let value = self.get(key).unwrap_or_else(|| default.to_string());
        value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.client.base_url, "https://api.aladhan.com");
        assert_eq!(config.client.method, 8);
        assert_eq!(config.client.relays.len(), 4);
        assert_eq!(config.cache.ttl, Duration::from_secs(6 * 60 * 60));
        assert!(config.monitoring_store.is_none());
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("PRAYER_BIND_ADDR", "0.0.0.0:8080"),
            ("ALADHAN_BASE_URL", "http://localhost:9000"),
            ("ALADHAN_METHOD", "11"),
            ("PRAYER_ORIGIN", "https://masjid.test"),
            ("PRAYER_RELAYS", "https://relay-a.test/?url=, https://relay-b.test/"),
            ("PRAYER_TIMEOUT_SECS", "5"),
            ("PRAYER_BACKOFF_MS", "250"),
            ("PRAYER_CACHE_TTL_SECS", "60"),
            ("MONITORING_STORE", "/var/lib/prayer/monitor.json"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.client.base_url, "http://localhost:9000");
        assert_eq!(config.client.method, 11);
        assert_eq!(config.client.origin, "https://masjid.test");
        assert_eq!(
            config.client.relays,
            vec!["https://relay-a.test/?url=".to_string(), "https://relay-b.test/".to_string()]
        );
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.client.backoff_step, Duration::from_millis(250));
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(
            config.monitoring_store,
            Some(PathBuf::from("/var/lib/prayer/monitor.json"))
        );
    }

    #[test]
    fn empty_relays_disables_relays() {
        let config = load(&[("PRAYER_RELAYS", "")]).unwrap();
        assert!(config.client.relays.is_empty());
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = load(&[("ALADHAN_METHOD", "gulf")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ALADHAN_METHOD", .. }));
        assert!(err.to_string().contains("gulf"));

        assert!(load(&[("PRAYER_BIND_ADDR", "localhost")]).is_err());
        assert!(load(&[("PRAYER_TIMEOUT_SECS", "-1")]).is_err());
    }
}
