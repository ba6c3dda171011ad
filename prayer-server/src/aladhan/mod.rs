//! Aladhan prayer times client.
//!
//! This module provides a client for the Aladhan timings API
//! (`GET /v1/timings/{date}?latitude=..&longitude=..&method=..`).
//!
//! Key characteristics of the provider:
//! - Times are "HH:MM" strings, already local to the coordinates
//! - `code` in the body is the success marker; HTTP 200 alone is not enough
//! - Sunset and Maghrib are separate fields; the schedule shows Maghrib only

mod client;
mod convert;
mod error;
mod types;


pub use client::{PrayerClient, PrayerClientConfig};
pub use convert::{ConversionError, convert_timings};
pub use error::PrayerError;
pub use types::{Envelope, RawDate, RawTimings, TimingsData};
