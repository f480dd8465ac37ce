//! Configuration file loading for boardroom
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BOARDROOM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./boardroom.toml` or `./.boardroom.toml`
//! 4. Global: `$XDG_CONFIG_HOME/boardroom/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_LISTEN_ADDR, FileAuditConfig, FileBusConfig, FileConfig, FileEscalationConfig,
    FileGovernanceConfig, FileServerConfig, FileTasksConfig,
};
pub use loader::ConfigLoader;
