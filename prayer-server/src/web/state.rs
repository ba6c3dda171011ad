//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedPrayerClient;
use crate::monitoring::MonitorHandle;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached prayer time client
    pub prayers: Arc<CachedPrayerClient>,

    /// Application monitor
    pub monitor: MonitorHandle,
}

impl AppState {
    /// Create a new app state.
    pub fn new(prayers: CachedPrayerClient, monitor: MonitorHandle) -> Self {
        Self {
            prayers: Arc::new(prayers),
            monitor,
        }
    }
}
