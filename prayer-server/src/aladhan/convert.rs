//! Conversion from provider timings to domain timings.

use crate::domain::{ClockTime, InvalidClockTime, Prayer, Timings};

use super::types::RawTimings;

/// A provider timing that is not a valid "HH:MM".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {prayer} time from provider: {source}")]
pub struct ConversionError {
    pub prayer: Prayer,
    #[source]
    pub source: InvalidClockTime,
}

/// Pick the six scheduled timings out of the provider's named fields.
///
/// Sunset is dropped; Maghrib stands in for it. Values are validated but
/// otherwise kept as sent.
pub fn convert_timings(raw: &RawTimings) -> Result<Timings, ConversionError> {
    let parse = |prayer: Prayer, value: &str| {
        ClockTime::parse_hhmm(value).map_err(|source| ConversionError { prayer, source })
    };

    Ok(Timings {
        fajr: parse(Prayer::Fajr, &raw.fajr)?,
        sunrise: parse(Prayer::Sunrise, &raw.sunrise)?,
        dhuhr: parse(Prayer::Dhuhr, &raw.dhuhr)?,
        asr: parse(Prayer::Asr, &raw.asr)?,
        maghrib: parse(Prayer::Maghrib, &raw.maghrib)?,
        isha: parse(Prayer::Isha, &raw.isha)?,
    })
}
