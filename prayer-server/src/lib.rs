//! Prayer times server for a mosque management site.
//!
//! Fetches the day's prayer schedule for an Indonesian city from the
//! Aladhan API (direct first, then through relays), falls back to a static
//! table when the provider is unreachable, and keeps a bounded record of
//! application logs, metrics and security events.

pub mod aladhan;
pub mod cache;
pub mod cities;
pub mod config;
pub mod domain;
pub mod fallback;
pub mod monitoring;
pub mod schedule;
pub mod transport;
pub mod web;
