//! Prayer time client error types.

use crate::transport::TransportError;

use super::convert::ConversionError;

/// Errors from fetching prayer times.
#[derive(Debug, thiserror::Error)]
pub enum PrayerError {
    /// No attempt produced a response, or the client could not be built
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    /// The provider (or a relay) answered with a non-2xx status
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// Body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// HTTP succeeded but the envelope code was not 200
    #[error("provider error {code}: {status}")]
    Provider { code: i64, status: String },

    /// A timing was not a valid "HH:MM"
    #[error(transparent)]
    InvalidTiming(#[from] ConversionError),
}

impl PrayerError {
    /// True when the failure happened before any response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, PrayerError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PrayerError::Http {
            status: 500,
            status_text: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");

        let err = PrayerError::Provider {
            code: 400,
            status: "BAD_REQUEST".into(),
        };
        assert_eq!(err.to_string(), "provider error 400: BAD_REQUEST");

        let err = PrayerError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
    }

    #[test]
    fn transport_errors_convert() {
        let err: PrayerError = TransportError::Exhausted {
            attempts: 6,
            last_error: "down".into(),
        }
        .into();

        assert!(err.is_network());
        assert!(err.to_string().contains("all attempts failed"));
    }
}
