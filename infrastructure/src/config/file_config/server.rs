//! HTTP server configuration from TOML (`[server]` section)

use boardroom_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Raw server configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Socket address the HTTP API binds to
    pub listen_addr: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

impl FileServerConfig {
    pub fn parse_listen_addr(&self) -> (Option<SocketAddr>, Vec<ConfigIssue>) {
        match self.listen_addr.trim().parse::<SocketAddr>() {
            Ok(addr) => (Some(addr), Vec::new()),
            Err(e) => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidListenAddr,
                    format!("server.listen_addr '{}': {}", self.listen_addr, e),
                )],
            ),
        }
    }
}
