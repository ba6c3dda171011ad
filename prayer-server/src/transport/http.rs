//! The transport seam and its reqwest implementation.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::StatusCode;

use super::error::TransportError;

/// How the request should be issued.
///
/// Browsers distinguish an explicit cross-origin request from a plain one;
/// outside a browser both are ordinary GETs, but the mode is kept so that
/// transports and logs can tell the two direct attempts apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Cors,
    Default,
}

/// A single GET request produced by one attempt of the strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub url: String,
    pub mode: RequestMode,
    pub headers: Vec<(&'static str, String)>,
}

impl TransportRequest {
    /// Plain GET with no custom headers.
    pub fn get(url: impl Into<String>, mode: RequestMode) -> Self {
        Self {
            url: url.into(),
            mode,
            headers: Vec::new(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Look up a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A fully-read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl TransportResponse {
    /// Build a response, filling the reason phrase from the status code.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform a GET request.
///
/// Returning `Err` means the request never produced an HTTP response; any
/// response, whatever its status, is `Ok`.
pub trait Transport: Send + Sync {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, Result<TransportResponse, TransportError>>;
}

/// Transport backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, Result<TransportResponse, TransportError>> {
        async move {
            let mut builder = self.http.get(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(*name, value);
            }

            let response = builder.send().await?;
            let status = response.status();
            let body = response.text().await?;

            Ok(TransportResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_reason_phrase() {
        let ok = TransportResponse::new(200, "{}");
        assert_eq!(ok.status_text, "OK");
        assert!(ok.is_success());

        let err = TransportResponse::new(500, "");
        assert_eq!(err.status_text, "Internal Server Error");
        assert!(!err.is_success());

        let odd = TransportResponse::new(599, "");
        assert_eq!(odd.status_text, "");
    }

    #[test]
    fn request_headers() {
        let req = TransportRequest::get("http://example.test", RequestMode::Default)
            .with_header("Accept", "application/json");
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("Origin"), None);
    }

    #[test]
    fn transport_creation() {
        assert!(HttpTransport::new(Duration::from_secs(5)).is_ok());
    }
}
