//! Static fallback schedule.
//!
//! Approximate Jakarta times used when the provider cannot be reached.
//! A handful of dates have their own entry; every other date gets the
//! default. Pure data, no I/O, cannot fail.

use chrono::{Datelike, NaiveDate};

use crate::domain::{ClockTime, Language, Schedule, Timings};

const fn timings(
    fajr: (u8, u8),
    sunrise: (u8, u8),
    dhuhr: (u8, u8),
    asr: (u8, u8),
    maghrib: (u8, u8),
    isha: (u8, u8),
) -> Timings {
    Timings {
        fajr: ClockTime::hm(fajr.0, fajr.1),
        sunrise: ClockTime::hm(sunrise.0, sunrise.1),
        dhuhr: ClockTime::hm(dhuhr.0, dhuhr.1),
        asr: ClockTime::hm(asr.0, asr.1),
        maghrib: ClockTime::hm(maghrib.0, maghrib.1),
        isha: ClockTime::hm(isha.0, isha.1),
    }
}

/// Times used for any date not in the table.
const DEFAULT_TIMINGS: Timings = timings((4, 30), (5, 55), (12, 0), (15, 15), (18, 5), (19, 20));

/// Per-date entries as ((year, month, day), timings).
const FALLBACK_TABLE: [((i32, u32, u32), Timings); 3] = [
    (
        (2025, 1, 23),
        timings((4, 30), (5, 55), (12, 0), (15, 15), (18, 5), (19, 20)),
    ),
    (
        (2025, 1, 24),
        timings((4, 30), (5, 55), (12, 0), (15, 15), (18, 5), (19, 20)),
    ),
    (
        (2025, 8, 24),
        timings((4, 45), (6, 0), (12, 0), (15, 30), (18, 0), (19, 15)),
    ),
];

/// Raw fallback timings for a date.
pub fn fallback_timings(date: NaiveDate) -> Timings {
    let key = (date.year(), date.month(), date.day());
    FALLBACK_TABLE
        .iter()
        .find(|(d, _)| *d == key)
        .map(|(_, t)| *t)
        .unwrap_or(DEFAULT_TIMINGS)
}

/// Localized fallback schedule for a date.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use prayer_server::domain::Language;
/// use prayer_server::fallback::fallback_times;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 23).unwrap();
/// let schedule = fallback_times(date, Language::Local);
/// assert_eq!(schedule[0].name, "Subuh");
/// assert_eq!(schedule[0].time.to_string(), "04:30");
/// ```
pub fn fallback_times(date: NaiveDate, language: Language) -> Schedule {
    Schedule::localized(date, language, &fallback_timings(date))
}

/// True if the date has its own table entry.
pub fn has_entry(date: NaiveDate) -> bool {
    let key = (date.year(), date.month(), date.day());
    FALLBACK_TABLE.iter().any(|(d, _)| *d == key)
}
