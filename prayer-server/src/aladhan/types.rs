//! Aladhan API response DTOs.
//!
//! These map the JSON returned by `GET /v1/timings/{date}`. The envelope is
//! parsed first; `data` is only interpreted as timings once `code` says the
//! call succeeded, because on failure the provider puts an error string
//! there instead.

use serde::Deserialize;

/// Top-level response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// 200 on success; anything else is a provider-level error.
    pub code: i64,

    /// "OK" on success, otherwise an error description.
    #[serde(default)]
    pub status: String,

    /// Timings payload on success, arbitrary JSON otherwise.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Successful `data` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TimingsData {
    pub timings: RawTimings,
    pub date: Option<RawDate>,
}

/// Named timings as returned by the provider.
///
/// The provider also sends Imsak, Midnight and others, which are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTimings {
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    /// Not shown on the schedule; Maghrib is used instead.
    pub sunset: Option<String>,
    pub maghrib: String,
    pub isha: String,
}

/// Date block of a successful payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDate {
    /// e.g. "23 Jan 2025".
    pub readable: String,
    /// Unix timestamp as a string.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_success_payload() {
        let json = r#"{
            "code": 200,
            "status": "OK",
            "data": {
                "timings": {
                    "Fajr": "04:21", "Sunrise": "05:38", "Dhuhr": "11:55",
                    "Asr": "15:21", "Sunset": "18:12", "Maghrib": "18:12",
                    "Isha": "19:27", "Imsak": "04:11", "Midnight": "23:55"
                },
                "date": { "readable": "23 Jan 2025", "timestamp": "1737590400" }
            }
        }"#;

        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.code, 200);

        let data: TimingsData = serde_json::from_value(envelope.data).unwrap();
        assert_eq!(data.timings.fajr, "04:21");
        assert_eq!(data.timings.sunset.as_deref(), Some("18:12"));
        assert_eq!(data.date.unwrap().readable, "23 Jan 2025");
    }

    #[test]
    fn parse_error_payload() {
        let json = r#"{"code": 400, "status": "BAD_REQUEST", "data": "Please specify a valid date."}"#;

        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.code, 400);
        assert_eq!(envelope.status, "BAD_REQUEST");
        assert!(envelope.data.is_string());
    }
}
