//! Monitoring records and their enumerations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Auth,
    Financial,
    Admin,
    System,
    Security,
    Performance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    PageLoad,
    ApiCall,
    DatabaseQuery,
    RenderTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    Ms,
    Bytes,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventKind {
    LoginAttempt,
    LoginSuccess,
    LoginFailure,
    Logout,
    PermissionDenied,
    SuspiciousActivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// High and critical events raise an alert.
    pub fn is_alert(self) -> bool {
        self >= Severity::High
    }
}

/// A stored application log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub category: LogCategory,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default)]
    pub details: Value,
    pub session_id: String,
}

/// A stored performance measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub metric: MetricKind,
    pub value: f64,
    pub unit: MetricUnit,
    #[serde(default)]
    pub details: Value,
}

/// A stored security event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub event: SecurityEventKind,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default)]
    pub details: Value,
}

/// A log entry as submitted, before id, timestamp and session are assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct LogInput {
    pub level: LogLevel,
    pub category: LogCategory,
    pub action: String,
    #[serde(default)]
    pub details: Value,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

impl LogInput {
    pub fn new(level: LogLevel, category: LogCategory, action: impl Into<String>) -> Self {
        Self {
            level,
            category,
            action: action.into(),
            details: Value::Null,
            user_id: None,
            user_email: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>, user_email: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self.user_email = Some(user_email.into());
        self
    }
}

/// A metric as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricInput {
    pub metric: MetricKind,
    pub value: f64,
    pub unit: MetricUnit,
    #[serde(default)]
    pub details: Value,
}

impl MetricInput {
    pub fn new(metric: MetricKind, value: f64, unit: MetricUnit) -> Self {
        Self {
            metric,
            value,
            unit,
            details: Value::Null,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

/// A security event as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityInput {
    pub event: SecurityEventKind,
    pub severity: Severity,
    #[serde(default)]
    pub details: Value,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

impl SecurityInput {
    pub fn new(event: SecurityEventKind, severity: Severity) -> Self {
        Self {
            event,
            severity,
            details: Value::Null,
            user_id: None,
            user_email: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>, user_email: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self.user_email = Some(user_email.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enums_use_snake_case() {
        assert_eq!(serde_json::to_value(MetricKind::PageLoad).unwrap(), json!("page_load"));
        assert_eq!(serde_json::to_value(MetricUnit::Ms).unwrap(), json!("ms"));
        assert_eq!(
            serde_json::to_value(SecurityEventKind::SuspiciousActivity).unwrap(),
            json!("suspicious_activity")
        );
        assert_eq!(serde_json::to_value(LogLevel::Warn).unwrap(), json!("warn"));
    }

    #[test]
    fn alert_severities() {
        assert!(!Severity::Low.is_alert());
        assert!(!Severity::Medium.is_alert());
        assert!(Severity::High.is_alert());
        assert!(Severity::Critical.is_alert());
    }

    #[test]
    fn log_input_from_json() {
        let input: LogInput = serde_json::from_value(json!({
            "level": "error",
            "category": "financial",
            "action": "donation_failed",
            "details": { "amount": 50000 }
        }))
        .unwrap();

        assert_eq!(input.level, LogLevel::Error);
        assert_eq!(input.category, LogCategory::Financial);
        assert_eq!(input.details["amount"], 50000);
        assert!(input.user_id.is_none());
    }

    #[test]
    fn unknown_category_rejected() {
        let result: Result<LogInput, _> = serde_json::from_value(json!({
            "level": "info",
            "category": "weather",
            "action": "x"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn missing_user_fields_are_omitted() {
        let entry = LogEntry {
            id: "log_1".into(),
            timestamp: DateTime::parse_from_rfc3339("2025-01-23T04:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            level: LogLevel::Info,
            category: LogCategory::System,
            action: "boot".into(),
            user_id: None,
            user_email: None,
            details: Value::Null,
            session_id: "session_x".into(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("user_id").is_none());
        assert_eq!(value["timestamp"], json!("2025-01-23T04:30:00Z"));
    }
}
