//! Raw TOML configuration data types
//!
//! These structs mirror the config file one-to-one and are deserialized
//! directly. Conversion into runtime types reports problems as
//! [`ConfigIssue`]s instead of failing.

mod bus;
mod escalation;
mod governance;
mod persistence;
mod server;

pub use bus::FileBusConfig;
pub use escalation::FileEscalationConfig;
pub use governance::FileGovernanceConfig;
pub use persistence::{FileAuditConfig, FileTasksConfig};
pub use server::{DEFAULT_LISTEN_ADDR, FileServerConfig};

use boardroom_application::GovernanceConfig;
use boardroom_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Round budget, deadlines and sweep cadence
    pub governance: FileGovernanceConfig,
    /// Escalation channels
    pub escalation: FileEscalationConfig,
    /// HTTP API
    pub server: FileServerConfig,
    /// Audit trail sink
    pub audit: FileAuditConfig,
    /// Task queue persistence
    pub tasks: FileTasksConfig,
    /// Channel bus tuning
    pub bus: FileBusConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.governance.validate();
        issues.extend(self.escalation.parse_default_channels().1);
        issues.extend(self.server.parse_listen_addr().1);

        if self.bus.channel_capacity == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroChannelCapacity,
                "bus.channel_capacity = 0, using 1",
            ));
        }

        issues
    }

    /// Build the runtime governance parameters.
    ///
    /// A zero sweep interval is raised to one second.
    pub fn to_governance_config(&self) -> GovernanceConfig {
        let g = &self.governance;
        GovernanceConfig::default()
            .with_max_veto_rounds(g.max_veto_rounds)
            .with_head_round_deadline(hours(g.head_round_deadline_hours))
            .with_clevel_round_deadline(hours(g.clevel_round_deadline_hours))
            .with_sweep_interval(std::time::Duration::from_secs(g.sweep_interval_secs.max(1)))
            .with_default_channels(self.escalation.parse_default_channels().0)
    }
}

fn hours(h: u64) -> chrono::Duration {
    chrono::Duration::hours(i64::try_from(h).unwrap_or(i64::MAX).min(MAX_DEADLINE_HOURS))
}

/// Keeps `now + window` far inside chrono's representable range.
const MAX_DEADLINE_HOURS: i64 = 24 * 365 * 100;
