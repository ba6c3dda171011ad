//! On-disk snapshot of the monitoring buffers.
//!
//! Snapshots are written to a temporary file beside the target and renamed
//! over it, so a reader only ever sees a complete snapshot or the previous
//! one.

use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::buffer::BoundedBuffer;
use super::entry::{LogEntry, PerformanceMetric, SecurityEvent};
use super::error::MonitorError;

/// Snapshot as read back from disk.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub performance_metrics: Vec<PerformanceMetric>,
    #[serde(default)]
    pub security_events: Vec<SecurityEvent>,
}

/// Borrowed view written to disk.
#[derive(Debug, Serialize)]
pub struct SnapshotRef<'a> {
    pub logs: &'a BoundedBuffer<LogEntry>,
    pub performance_metrics: &'a BoundedBuffer<PerformanceMetric>,
    pub security_events: &'a BoundedBuffer<SecurityEvent>,
}

/// JSON file holding all three buffers.
///
/// Clones share one write sequence: a snapshot staged earlier never
/// replaces one staged later, whatever order the writes finish in.
#[derive(Debug, Clone)]
pub struct MonitorStore {
    path: PathBuf,
    staged: Arc<AtomicU64>,
    written: Arc<Mutex<u64>>,
}

impl MonitorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            staged: Arc::new(AtomicU64::new(0)),
            written: Arc::new(Mutex::new(0)),
        }
    }

    /// Load the snapshot. A missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<Snapshot>, MonitorError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(MonitorError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| MonitorError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    /// Serialize and write the snapshot now.
    pub fn save(&self, snapshot: &SnapshotRef<'_>) -> Result<(), MonitorError> {
        let json = serde_json::to_string(snapshot)?;
        self.write_staged(self.stage(), &json).map(|_| ())
    }

    /// Reserve the next position in the write sequence.
    pub fn stage(&self) -> u64 {
        self.staged.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Write `json` unless a later staged snapshot is already on disk.
    ///
    /// Returns whether the file was replaced.
    pub fn write_staged(&self, staged: u64, json: &str) -> Result<bool, MonitorError> {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if staged <= *written {
            return Ok(false);
        }
        self.replace(json)?;
        *written = staged;
        Ok(true)
    }

    fn replace(&self, json: &str) -> Result<(), MonitorError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|source| MonitorError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let failed = |source| MonitorError::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = NamedTempFile::new_in(dir).map_err(failed)?;
        file.write_all(json.as_bytes()).map_err(failed)?;
        file.as_file().sync_all().map_err(failed)?;
        file.persist(&self.path).map_err(|e| failed(e.error))?;
        Ok(())
    }

    /// Move an unreadable snapshot aside so the next save cannot destroy it.
    ///
    /// Returns where the file now lives.
    pub fn quarantine(&self) -> Result<PathBuf, MonitorError> {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".corrupt");
        let target = PathBuf::from(name);

        std::fs::rename(&self.path, &target).map_err(|source| MonitorError::Write {
            path: target.clone(),
            source,
        })?;
        Ok(target)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
