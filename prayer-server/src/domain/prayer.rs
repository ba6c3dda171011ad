//! The six daily entries and their display names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a language code is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language {0:?} (expected \"id\" or \"en\")")]
pub struct InvalidLanguage(String);

/// Display language for prayer names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// Indonesian labels (Subuh, Dzuhur, ...).
    #[default]
    #[serde(rename = "id", alias = "local")]
    Local,
    /// English labels (Fajr, Dhuhr, ...).
    #[serde(rename = "en", alias = "english")]
    English,
}

impl Language {
    /// Short code used on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Language::Local => "id",
            Language::English => "en",
        }
    }
}

impl FromStr for Language {
    type Err = InvalidLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" | "local" => Ok(Language::Local),
            "en" | "english" => Ok(Language::English),
            _ => Err(InvalidLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One of the six entries shown on the daily schedule, in canonical order.
///
/// Sunrise is not a prayer but is shown alongside them. The provider's
/// separate Sunset timing has no entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    /// All entries in canonical order.
    pub const ALL: [Prayer; 6] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    /// 1-based position in the canonical order.
    pub fn ordinal(self) -> u8 {
        match self {
            Prayer::Fajr => 1,
            Prayer::Sunrise => 2,
            Prayer::Dhuhr => 3,
            Prayer::Asr => 4,
            Prayer::Maghrib => 5,
            Prayer::Isha => 6,
        }
    }

    /// Localized display name.
    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Prayer::Fajr, Language::Local) => "Subuh",
            (Prayer::Fajr, Language::English) => "Fajr",
            (Prayer::Sunrise, Language::Local) => "Terbit",
            (Prayer::Sunrise, Language::English) => "Sunrise",
            (Prayer::Dhuhr, Language::Local) => "Dzuhur",
            (Prayer::Dhuhr, Language::English) => "Dhuhr",
            (Prayer::Asr, Language::Local) => "Ashar",
            (Prayer::Asr, Language::English) => "Asr",
            (Prayer::Maghrib, _) => "Maghrib",
            (Prayer::Isha, Language::Local) => "Isya",
            (Prayer::Isha, Language::English) => "Isha",
        }
    }

    /// Field name used by the Aladhan API.
    pub fn provider_key(self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider_key())
    }
}
