//! Application monitoring.
//!
//! Keeps bounded histories of application logs, performance metrics and
//! security events, mirrors each one to `tracing`, and optionally persists
//! the lot to a JSON snapshot after every change.

mod buffer;
mod entry;
mod error;
mod monitor;
mod store;


use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use buffer::BoundedBuffer;
pub use entry::{
    LogCategory, LogEntry, LogInput, LogLevel, MetricInput, MetricKind, MetricUnit,
    PerformanceMetric, SecurityEvent, SecurityEventKind, SecurityInput, Severity,
};
pub use error::MonitorError;
pub use monitor::{
    Analytics, DEFAULT_LOG_LIMIT, LogFilter, MAX_LOGS, MAX_METRICS, MAX_SECURITY_EVENTS,
    MetricFilter, Monitor, PerformanceSummary, SecurityFilter, WindowSummary, export_file_name,
};
pub use store::{MonitorStore, Snapshot, SnapshotRef};

/// Shared, cloneable access to one `Monitor`.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    inner: Arc<RwLock<Monitor>>,
}

impl MonitorHandle {
    pub fn new(monitor: Monitor) -> Self {
        Self {
            inner: Arc::new(RwLock::new(monitor)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Monitor> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Monitor> {
        self.inner.write().await
    }
}
