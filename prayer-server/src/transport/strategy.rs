//! Ordered fallback transports for reaching a third-party API.
//!
//! Attempts run strictly in sequence:
//!
//! 1. direct request, cross-origin mode, no custom headers
//! 2. direct request with default settings
//! 3. one attempt per relay, with the target URL appended verbatim to the
//!    relay prefix and `Accept`/`Origin` headers set
//!
//! Before attempt `i` (zero-based, `i > 0`) the strategy sleeps
//! `backoff_step * i`. The first attempt that yields any HTTP response wins;
//! only transport-level failures move on to the next attempt.

use std::time::Duration;

use tracing::{debug, warn};

use super::error::TransportError;
use super::http::{RequestMode, Transport, TransportRequest, TransportResponse};

/// Public relay endpoints, tried in this order after the direct attempts.
pub const DEFAULT_RELAYS: [&str; 4] = [
    "https://api.allorigins.win/raw?url=",
    "https://corsproxy.io/?",
    "https://thingproxy.freeboard.io/fetch/",
    "https://cors-anywhere.herokuapp.com/",
];

/// Origin sent to relays when none is configured.
pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// Default linear backoff step.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(1000);

/// One way of reaching the target URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Direct,
    Simple,
    Relay(String),
}

impl Attempt {
    /// Build the request this attempt sends for `url`.
    pub fn request(&self, url: &str, origin: &str) -> TransportRequest {
        match self {
            Attempt::Direct => TransportRequest::get(url, RequestMode::Cors),
            Attempt::Simple => TransportRequest::get(url, RequestMode::Default),
            Attempt::Relay(prefix) => {
                TransportRequest::get(format!("{prefix}{url}"), RequestMode::Default)
                    .with_header("Accept", "application/json")
                    .with_header("Origin", origin)
            }
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &str {
        match self {
            Attempt::Direct => "direct",
            Attempt::Simple => "simple",
            Attempt::Relay(prefix) => prefix,
        }
    }
}

/// A bounded chain of attempts with linear backoff.
#[derive(Debug, Clone)]
pub struct RequestStrategy {
    relays: Vec<String>,
    origin: String,
    backoff_step: Duration,
}

impl RequestStrategy {
    /// Create a strategy with the given relays and origin.
    pub fn new(relays: Vec<String>, origin: impl Into<String>) -> Self {
        Self {
            relays,
            origin: origin.into(),
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }

    /// Set the backoff step (zero disables waiting).
    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    /// The attempts, in the order they are tried.
    pub fn attempts(&self) -> Vec<Attempt> {
        [Attempt::Direct, Attempt::Simple]
            .into_iter()
            .chain(self.relays.iter().cloned().map(Attempt::Relay))
            .collect()
    }

    /// Total number of attempts: the two direct ones plus one per relay.
    pub fn max_attempts(&self) -> usize {
        self.relays.len() + 2
    }

    /// Wait before the attempt at `index`.
    pub fn backoff_before(&self, index: usize) -> Duration {
        self.backoff_step * u32::try_from(index).unwrap_or(u32::MAX)
    }

    pub fn relays(&self) -> &[String] {
        &self.relays
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Run the chain for `url` until an attempt produces a response.
    pub async fn attempt_request(
        &self,
        transport: &dyn Transport,
        url: &str,
    ) -> Result<TransportResponse, TransportError> {
        let attempts = self.attempts();
        let total = attempts.len();
        let mut last_error = None;

        for (index, attempt) in attempts.iter().enumerate() {
            let delay = self.backoff_before(index);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            debug!(attempt = index + 1, total, via = attempt.label(), "sending request");

            match transport.send(attempt.request(url, &self.origin)).await {
                Ok(response) => {
                    debug!(
                        attempt = index + 1,
                        status = response.status,
                        via = attempt.label(),
                        "attempt produced a response"
                    );
                    return Ok(response);
                }
                Err(e) => {
                    warn!(attempt = index + 1, total, via = attempt.label(), error = %e, "attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(TransportError::Exhausted {
            attempts: total,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts configured".to_string()),
        })
    }
}

impl Default for RequestStrategy {
    fn default() -> Self {
        Self::new(
            DEFAULT_RELAYS.iter().map(|r| r.to_string()).collect(),
            DEFAULT_ORIGIN,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::transport::{MockReply, MockTransport};

    const TARGET: &str = "https://api.example.test/v1/thing?x=1";

    fn strategy() -> RequestStrategy {
        RequestStrategy::default().with_backoff_step(Duration::ZERO)
    }

    #[test]
    fn default_attempt_order() {
        let attempts = RequestStrategy::default().attempts();

        assert_eq!(attempts.len(), 6);
        assert_eq!(attempts[0], Attempt::Direct);
        assert_eq!(attempts[1], Attempt::Simple);
        assert_eq!(
            attempts[2],
            Attempt::Relay("https://api.allorigins.win/raw?url=".into())
        );
        assert_eq!(
            attempts[5],
            Attempt::Relay("https://cors-anywhere.herokuapp.com/".into())
        );
        assert_eq!(RequestStrategy::default().max_attempts(), 6);
    }

    #[test]
    fn direct_requests_have_no_headers() {
        let direct = Attempt::Direct.request(TARGET, "http://mosque.test");
        assert_eq!(direct.url, TARGET);
        assert_eq!(direct.mode, RequestMode::Cors);
        assert!(direct.headers.is_empty());

        let simple = Attempt::Simple.request(TARGET, "http://mosque.test");
        assert_eq!(simple.mode, RequestMode::Default);
        assert!(simple.headers.is_empty());
    }

    #[test]
    fn relay_prefixes_url_verbatim() {
        let relay = Attempt::Relay("https://corsproxy.io/?".into()).request(TARGET, "http://mosque.test");

        assert_eq!(relay.url, format!("https://corsproxy.io/?{TARGET}"));
        assert_eq!(relay.header("Accept"), Some("application/json"));
        assert_eq!(relay.header("Origin"), Some("http://mosque.test"));
    }

    #[test]
    fn linear_backoff() {
        let s = RequestStrategy::default();
        assert_eq!(s.backoff_before(0), Duration::ZERO);
        assert_eq!(s.backoff_before(1), Duration::from_millis(1000));
        assert_eq!(s.backoff_before(3), Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn first_response_wins() {
        let mock = MockTransport::always(MockReply::text(200, "ok"));
        let response = strategy().attempt_request(&mock, TARGET).await.unwrap();

        assert_eq!(response.body, "ok");
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn falls_through_to_relay() {
        let mock = MockTransport::scripted(
            [MockReply::fail("cors"), MockReply::fail("cors"), MockReply::fail("relay down")],
            MockReply::text(200, "via relay"),
        );

        let response = strategy().attempt_request(&mock, TARGET).await.unwrap();

        assert_eq!(response.body, "via relay");
        assert_eq!(
            mock.urls(),
            vec![
                TARGET.to_string(),
                TARGET.to_string(),
                format!("https://api.allorigins.win/raw?url={TARGET}"),
                format!("https://corsproxy.io/?{TARGET}"),
            ]
        );
    }

    #[tokio::test]
    async fn error_status_ends_the_chain() {
        let mock = MockTransport::always(MockReply::text(500, "boom"));
        let response = strategy().attempt_request(&mock, TARGET).await.unwrap();

        assert_eq!(response.status, 500);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn exhausted_after_every_attempt() {
        let mock = MockTransport::always(MockReply::fail("network unreachable"));
        let err = strategy().attempt_request(&mock, TARGET).await.unwrap_err();

        assert!(matches!(err, TransportError::Exhausted { attempts: 6, .. }));
        assert!(err.to_string().contains("all attempts failed"));
        assert!(err.to_string().contains("network unreachable"));
        assert_eq!(mock.request_count(), 6);
    }

    #[tokio::test]
    async fn no_relays_means_two_attempts() {
        let mock = MockTransport::always(MockReply::fail("down"));
        let s = RequestStrategy::new(vec![], DEFAULT_ORIGIN).with_backoff_step(Duration::ZERO);

        assert!(s.attempt_request(&mock, TARGET).await.is_err());
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn waits_between_attempts() {
        let mock = MockTransport::always(MockReply::fail("down"));
        let s = RequestStrategy::new(vec!["http://relay.test/".into()], DEFAULT_ORIGIN)
            .with_backoff_step(Duration::from_millis(10));

        let start = Instant::now();
        let _ = s.attempt_request(&mock, TARGET).await;

        // 10ms before attempt 2, 20ms before attempt 3.
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(mock.request_count(), 3);
    }
}
