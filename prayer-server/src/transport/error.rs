//! Transport error types.

/// Errors from sending a request, or from running out of strategies.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, DNS, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint could not be reached
    #[error("connection failed: {0}")]
    Unreachable(String),

    /// Every attempt in the chain failed at the transport level
    #[error("all attempts failed after {attempts} tries: {last_error}")]
    Exhausted { attempts: usize, last_error: String },
}
