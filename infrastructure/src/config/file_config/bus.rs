//! Channel bus configuration from TOML (`[bus]` section)

use serde::{Deserialize, Serialize};

/// Raw bus configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBusConfig {
    /// Messages buffered per channel before slow subscribers lag
    pub channel_capacity: usize,
}

impl Default for FileBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: crate::bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
