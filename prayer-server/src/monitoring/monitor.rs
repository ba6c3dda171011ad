//! In-process monitoring: logs, performance metrics and security events.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::buffer::BoundedBuffer;
use super::entry::{
    LogCategory, LogEntry, LogInput, LogLevel, MetricInput, MetricKind, PerformanceMetric,
    SecurityEvent, SecurityEventKind, SecurityInput, Severity,
};
use super::error::MonitorError;
use super::store::{MonitorStore, SnapshotRef};

pub const MAX_LOGS: usize = 1000;
pub const MAX_METRICS: usize = 500;
pub const MAX_SECURITY_EVENTS: usize = 200;

/// Number of log entries returned when no limit is given.
pub const DEFAULT_LOG_LIMIT: usize = 100;

/// Log query. Bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogFilter {
    pub level: Option<LogLevel>,
    pub category: Option<LogCategory>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricFilter {
    pub metric: Option<MetricKind>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityFilter {
    pub severity: Option<Severity>,
    pub event: Option<SecurityEventKind>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

fn in_range(ts: DateTime<Utc>, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    start.is_none_or(|s| ts >= s) && end.is_none_or(|e| ts <= e)
}

/// Counts over a trailing time window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub total_logs: usize,
    pub errors: usize,
    pub warnings: usize,
    pub security_events: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub avg_page_load: f64,
    pub avg_api_call: f64,
    pub total_api_calls: usize,
}

/// Monitor-wide summary. Window counts cover every matching entry and are
/// not capped by the log query limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub session_id: String,
    pub total_logs: usize,
    pub total_metrics: usize,
    pub total_security_events: usize,
    pub last_24_hours: WindowSummary,
    pub last_7_days: WindowSummary,
    pub performance: PerformanceSummary,
}

#[derive(Serialize)]
struct Export<'a> {
    logs: &'a BoundedBuffer<LogEntry>,
    performance_metrics: &'a BoundedBuffer<PerformanceMetric>,
    security_events: &'a BoundedBuffer<SecurityEvent>,
    analytics: Analytics,
    export_date: DateTime<Utc>,
}

/// Bounded in-memory monitor with optional JSON persistence.
#[derive(Debug)]
pub struct Monitor {
    session_id: String,
    logs: BoundedBuffer<LogEntry>,
    metrics: BoundedBuffer<PerformanceMetric>,
    security: BoundedBuffer<SecurityEvent>,
    store: Option<MonitorStore>,
}

impl Monitor {
    /// A monitor that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            session_id: format!("session_{}", Uuid::new_v4()),
            logs: BoundedBuffer::new(MAX_LOGS),
            metrics: BoundedBuffer::new(MAX_METRICS),
            security: BoundedBuffer::new(MAX_SECURITY_EVENTS),
            store: None,
        }
    }

    /// A monitor backed by a snapshot file.
    ///
    /// An unreadable snapshot is logged and the monitor starts empty. A
    /// corrupt one is first moved aside to `<path>.corrupt`.
    pub fn with_store(store: MonitorStore) -> Self {
        let mut monitor = Self::in_memory();

        match store.load() {
            Ok(Some(snapshot)) => {
                monitor.logs = BoundedBuffer::from_vec(snapshot.logs, MAX_LOGS);
                monitor.metrics = BoundedBuffer::from_vec(snapshot.performance_metrics, MAX_METRICS);
                monitor.security =
                    BoundedBuffer::from_vec(snapshot.security_events, MAX_SECURITY_EVENTS);
                info!(
                    path = %store.path().display(),
                    logs = monitor.logs.len(),
                    metrics = monitor.metrics.len(),
                    security_events = monitor.security.len(),
                    "loaded monitoring snapshot"
                );
            }
            Ok(None) => {
                debug!(path = %store.path().display(), "no monitoring snapshot yet");
            }
            Err(e @ MonitorError::Corrupt { .. }) => match store.quarantine() {
                Ok(moved) => {
                    error!(error = %e, moved_to = %moved.display(), "corrupt monitoring snapshot set aside, starting empty");
                }
                Err(move_err) => {
                    error!(error = %e, quarantine_error = %move_err, "corrupt monitoring snapshot, starting empty");
                }
            },
            Err(e) => {
                error!(error = %e, "failed to load monitoring snapshot, starting empty");
            }
        }

        monitor.store = Some(store);
        monitor
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Record a log entry.
    pub fn log(&mut self, input: LogInput) -> LogEntry {
        let entry = LogEntry {
            id: format!("log_{}", Uuid::new_v4()),
            timestamp: Utc::now(),
            level: input.level,
            category: input.category,
            action: input.action,
            user_id: input.user_id,
            user_email: input.user_email,
            details: input.details,
            session_id: self.session_id.clone(),
        };

        match entry.level {
            LogLevel::Debug => debug!(category = ?entry.category, action = %entry.action, details = %entry.details, "app log"),
            LogLevel::Info => info!(category = ?entry.category, action = %entry.action, details = %entry.details, "app log"),
            LogLevel::Warn => warn!(category = ?entry.category, action = %entry.action, details = %entry.details, "app log"),
            LogLevel::Error => error!(category = ?entry.category, action = %entry.action, details = %entry.details, "app log"),
        }

        self.logs.push(entry.clone());
        self.persist();
        entry
    }

    /// Record a performance measurement.
    pub fn record_metric(&mut self, input: MetricInput) -> PerformanceMetric {
        let metric = PerformanceMetric {
            id: format!("metric_{}", Uuid::new_v4()),
            timestamp: Utc::now(),
            metric: input.metric,
            value: input.value,
            unit: input.unit,
            details: input.details,
        };

        debug!(metric = ?metric.metric, value = metric.value, unit = ?metric.unit, "performance metric");

        self.metrics.push(metric.clone());
        self.persist();
        metric
    }

    /// Record a security event. High and critical events raise an alert.
    pub fn record_security_event(&mut self, input: SecurityInput) -> SecurityEvent {
        let event = SecurityEvent {
            id: format!("security_{}", Uuid::new_v4()),
            timestamp: Utc::now(),
            event: input.event,
            severity: input.severity,
            user_id: input.user_id,
            user_email: input.user_email,
            details: input.details,
        };

        info!(event = ?event.event, severity = ?event.severity, "security event");

        self.security.push(event.clone());
        self.persist();

        if event.severity.is_alert() {
            warn!(
                id = %event.id,
                event = ?event.event,
                severity = ?event.severity,
                user_id = event.user_id.as_deref().unwrap_or_default(),
                details = %event.details,
                "SECURITY ALERT"
            );
        }
        event
    }

    /// Matching logs, the most recent `limit` in chronological order.
    pub fn logs(&self, filter: &LogFilter) -> Vec<LogEntry> {
        let limit = filter.limit.unwrap_or(DEFAULT_LOG_LIMIT);
        let mut matched: Vec<LogEntry> = self
            .matching_logs(filter)
            .rev()
            .take(limit)
            .cloned()
            .collect();
        matched.reverse();
        matched
    }

    fn matching_logs<'a>(
        &'a self,
        filter: &'a LogFilter,
    ) -> impl DoubleEndedIterator<Item = &'a LogEntry> + 'a {
        self.logs.iter().filter(move |log| {
            filter.level.is_none_or(|l| log.level == l)
                && filter.category.is_none_or(|c| log.category == c)
                && in_range(log.timestamp, filter.start, filter.end)
        })
    }

    pub fn metrics(&self, filter: &MetricFilter) -> Vec<PerformanceMetric> {
        self.metrics
            .iter()
            .filter(|m| {
                filter.metric.is_none_or(|k| m.metric == k)
                    && in_range(m.timestamp, filter.start, filter.end)
            })
            .cloned()
            .collect()
    }

    pub fn security_events(&self, filter: &SecurityFilter) -> Vec<SecurityEvent> {
        self.security
            .iter()
            .filter(|e| {
                filter.severity.is_none_or(|s| e.severity == s)
                    && filter.event.is_none_or(|k| e.event == k)
                    && in_range(e.timestamp, filter.start, filter.end)
            })
            .cloned()
            .collect()
    }

    fn window(&self, since: DateTime<Utc>) -> WindowSummary {
        let filter = LogFilter {
            start: Some(since),
            ..LogFilter::default()
        };

        let (mut total_logs, mut errors, mut warnings) = (0, 0, 0);
        for log in self.matching_logs(&filter) {
            total_logs += 1;
            match log.level {
                LogLevel::Error => errors += 1,
                LogLevel::Warn => warnings += 1,
                _ => {}
            }
        }

        WindowSummary {
            total_logs,
            errors,
            warnings,
            security_events: self.security.iter().filter(|e| e.timestamp >= since).count(),
        }
    }

    fn average(&self, kind: MetricKind) -> f64 {
        let (sum, count) = self
            .metrics
            .iter()
            .filter(|m| m.metric == kind)
            .fold((0.0, 0usize), |(sum, count), m| (sum + m.value, count + 1));
        if count == 0 { 0.0 } else { sum / count as f64 }
    }

    /// Totals, trailing windows and metric averages as of `now`.
    pub fn analytics(&self, now: DateTime<Utc>) -> Analytics {
        Analytics {
            session_id: self.session_id.clone(),
            total_logs: self.logs.len(),
            total_metrics: self.metrics.len(),
            total_security_events: self.security.len(),
            last_24_hours: self.window(now - Duration::hours(24)),
            last_7_days: self.window(now - Duration::days(7)),
            performance: PerformanceSummary {
                avg_page_load: self.average(MetricKind::PageLoad),
                avg_api_call: self.average(MetricKind::ApiCall),
                total_api_calls: self
                    .metrics
                    .iter()
                    .filter(|m| m.metric == MetricKind::ApiCall)
                    .count(),
            },
        }
    }

    /// Empty every buffer and persist the empty snapshot.
    pub fn clear(&mut self) {
        self.logs.clear();
        self.metrics.clear();
        self.security.clear();
        info!("monitoring data cleared");
        self.persist();
    }

    /// Pretty JSON dump of everything plus analytics.
    pub fn export(&self, now: DateTime<Utc>) -> Result<String, MonitorError> {
        let export = Export {
            logs: &self.logs,
            performance_metrics: &self.metrics,
            security_events: &self.security,
            analytics: self.analytics(now),
            export_date: now,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Stage the current buffers for saving.
    ///
    /// Inside a tokio runtime the file write runs on the blocking pool;
    /// otherwise it happens before returning.
    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let snapshot = SnapshotRef {
            logs: &self.logs,
            performance_metrics: &self.metrics,
            security_events: &self.security,
        };
        let json = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "failed to serialize monitoring snapshot");
                return;
            }
        };

        let staged = store.stage();
        let store = store.clone();
        let save = move || match store.write_staged(staged, &json) {
            Ok(true) => {}
            Ok(false) => debug!(staged, "newer monitoring snapshot already saved"),
            Err(e) => error!(error = %e, "failed to save monitoring snapshot"),
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn_blocking(save);
            }
            Err(_) => save(),
        }
    }
}

/// Download name for an export made at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("mosque-logs-{}.json", now.format("%Y-%m-%d"))
}
