//! Domain types for the prayer schedule.
//!
//! All types enforce their invariants at construction time: a `ClockTime`
//! is always a valid "HH:MM", and a `Schedule` always has six entries in
//! canonical order.

mod clock;
mod prayer;
mod schedule;

pub use clock::{ClockTime, InvalidClockTime};
pub use prayer::{InvalidLanguage, Language, Prayer};
pub use schedule::{PrayerTime, Schedule, Timings};
