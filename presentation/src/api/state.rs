//! Application state for API handlers

use boardroom_application::{Dispatcher, GovernanceService};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Decision governance (and, through it, escalations)
    pub governance: Arc<GovernanceService>,

    /// Entry point for injected agent messages
    pub dispatcher: Arc<Dispatcher>,

    /// Server version
    pub version: String,

    /// Server start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(governance: Arc<GovernanceService>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            governance,
            dispatcher,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
