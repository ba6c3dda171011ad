//! Wall-clock times as reported by the prayer-time provider.
//!
//! The provider sends times as "HH:MM" strings already in the local time of
//! the requested coordinates. We validate the shape but never convert.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid clock time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time {input:?}: {reason}")]
pub struct InvalidClockTime {
    input: String,
    reason: &'static str,
}

impl InvalidClockTime {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A time of day in "HH:MM" form, minute precision.
///
/// # Examples
///
/// ```
/// use prayer_server::domain::ClockTime;
///
/// let fajr = ClockTime::parse_hhmm("04:30").unwrap();
/// assert_eq!(fajr.to_string(), "04:30");
///
/// assert!(ClockTime::parse_hhmm("4:30").is_err());
/// assert!(ClockTime::parse_hhmm("24:00").is_err());
/// assert!(ClockTime::parse_hhmm("04:30 (WIB)").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Build a clock time from components known at compile time.
    ///
    /// Panics (at compile time when used in a const) if out of range.
    pub const fn hm(hour: u8, minute: u8) -> Self {
        assert!(hour < 24, "hour must be 0-23");
        assert!(minute < 60, "minute must be 0-59");
        Self { hour, minute }
    }

    /// Parse exactly five characters `HH:MM`.
    pub fn parse_hhmm(s: &str) -> Result<Self, InvalidClockTime> {
        if s.len() != 5 {
            return Err(InvalidClockTime::new(s, "expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(InvalidClockTime::new(s, "expected colon at position 2"));
        }

        let hour = parse_two_digits(&bytes[0..2])
            .ok_or_else(|| InvalidClockTime::new(s, "invalid hour digits"))?;
        if hour > 23 {
            return Err(InvalidClockTime::new(s, "hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| InvalidClockTime::new(s, "invalid minute digits"))?;
        if minute > 59 {
            return Err(InvalidClockTime::new(s, "minute must be 0-59"));
        }

        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight (0..1440).
    pub fn minutes_from_midnight(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    /// Truncate a `NaiveTime` to minute precision.
    pub fn from_naive(time: NaiveTime) -> Self {
        // NaiveTime guarantees hour < 24 and minute < 60.
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

fn parse_two_digits(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => Some((a - b'0') * 10 + (b - b'0')),
        _ => None,
    }
}

impl FromStr for ClockTime {
    type Err = InvalidClockTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({self})")
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hhmm(&s).map_err(serde::de::Error::custom)
    }
}
