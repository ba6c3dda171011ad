//! The daily schedule returned to callers.
//!
//! A `Schedule` always holds exactly six entries in canonical order, no
//! matter whether the times came from the provider or the fallback table.
//! The array type makes that impossible to violate.

use std::ops::Deref;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::clock::ClockTime;
use super::prayer::{Language, Prayer};

/// Window either side of a prayer time in which it counts as "current".
const CURRENT_WINDOW_MINS: u16 = 30;

/// The six clock times for one day, before localization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub fajr: ClockTime,
    pub sunrise: ClockTime,
    pub dhuhr: ClockTime,
    pub asr: ClockTime,
    pub maghrib: ClockTime,
    pub isha: ClockTime,
}

impl Timings {
    /// Time for a given entry.
    pub fn get(&self, prayer: Prayer) -> ClockTime {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Sunrise => self.sunrise,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }
}

/// A single localized schedule entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTime {
    /// Ordinal "1".."6".
    pub id: String,
    /// Localized display name.
    pub name: String,
    pub time: ClockTime,
    pub date: NaiveDate,
}

impl PrayerTime {
    fn new(prayer: Prayer, time: ClockTime, date: NaiveDate, language: Language) -> Self {
        Self {
            id: prayer.ordinal().to_string(),
            name: prayer.label(language).to_string(),
            time,
            date,
        }
    }
}

/// Exactly six prayer times in canonical order.
///
/// Serializes as a bare array. Only `localized` builds one, so the order
/// cannot be violated from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schedule {
    entries: [PrayerTime; 6],
}

impl Schedule {
    /// Build a localized schedule for `date` from raw timings.
    pub fn localized(date: NaiveDate, language: Language, timings: &Timings) -> Self {
        let entries =
            Prayer::ALL.map(|prayer| PrayerTime::new(prayer, timings.get(prayer), date, language));
        Self { entries }
    }

    /// The entries in canonical order.
    pub fn entries(&self) -> &[PrayerTime; 6] {
        &self.entries
    }

    /// Entry for a given prayer.
    pub fn get(&self, prayer: Prayer) -> &PrayerTime {
        &self.entries[usize::from(prayer.ordinal() - 1)]
    }

    /// The entry happening "now": the first whose time is less than 30
    /// minutes away from `now` in either direction, on the same day.
    pub fn current_prayer(&self, now: NaiveTime) -> Option<&PrayerTime> {
        let now_mins = ClockTime::from_naive(now).minutes_from_midnight();
        self.entries.iter().find(|entry| {
            entry.time.minutes_from_midnight().abs_diff(now_mins) < CURRENT_WINDOW_MINS
        })
    }

    pub fn into_vec(self) -> Vec<PrayerTime> {
        self.entries.into()
    }
}

impl Deref for Schedule {
    type Target = [PrayerTime];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a PrayerTime;
    type IntoIter = std::slice::Iter<'a, PrayerTime>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
