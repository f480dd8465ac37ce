//! Audit and task persistence from TOML (`[audit]`, `[tasks]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw audit configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// JSONL file the audit trail is appended to; unset keeps it in memory
    pub path: Option<PathBuf>,
}

/// Raw task queue configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTasksConfig {
    /// JSON file backing the task queues; unset keeps them in memory
    pub queue_path: Option<PathBuf>,
}
