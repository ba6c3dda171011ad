use std::path::PathBuf;

use thiserror::Error;

/// Errors from monitoring persistence and export.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt monitoring snapshot {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize monitoring data: {0}")]
    Serialize(#[from] serde_json::Error),
}
