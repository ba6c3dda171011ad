//! Network access with fallback transports.
//!
//! The prayer-time provider is not always directly reachable, so requests
//! go through a `RequestStrategy`: an ordered, strictly sequential chain of
//! attempts (direct, simple, then public relays) over a pluggable
//! `Transport`.

mod error;
mod http;
mod mock;
mod strategy;

pub use error::TransportError;
pub use http::{HttpTransport, RequestMode, Transport, TransportRequest, TransportResponse};
pub use mock::{MockReply, MockTransport};
pub use strategy::{
    Attempt, DEFAULT_BACKOFF_STEP, DEFAULT_ORIGIN, DEFAULT_RELAYS, RequestStrategy,
};
