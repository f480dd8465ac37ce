//! Governance parameters: round budget, deadlines and sweep cadence.
//!
//! [`GovernanceConfig`] holds the knobs the state machine and the deadline
//! sweep consult at runtime. The infrastructure layer builds it from the
//! `[governance]` and `[escalation]` sections of the config file.

use boardroom_domain::NotificationChannel;
use chrono::Duration;

/// Governance protocol parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceConfig {
    /// Split evaluations tolerated before a decision escalates.
    pub max_veto_rounds: u32,
    /// Window granted to HEAD for the first round of a new decision.
    pub head_round_deadline: Duration,
    /// Window granted to each C-level advisory round.
    pub clevel_round_deadline: Duration,
    /// How often the deadline sweep runs.
    pub sweep_interval: std::time::Duration,
    /// Channels notified when an escalation does not name any.
    pub default_channels: Vec<NotificationChannel>,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            max_veto_rounds: 3,
            head_round_deadline: Duration::hours(24),
            clevel_round_deadline: Duration::hours(12),
            sweep_interval: std::time::Duration::from_secs(60),
            default_channels: vec![NotificationChannel::Dashboard],
        }
    }
}

impl GovernanceConfig {
    // ==================== Builder Methods ====================

    pub fn with_max_veto_rounds(mut self, max: u32) -> Self {
        self.max_veto_rounds = max;
        self
    }

    pub fn with_head_round_deadline(mut self, window: Duration) -> Self {
        self.head_round_deadline = window;
        self
    }

    pub fn with_clevel_round_deadline(mut self, window: Duration) -> Self {
        self.clevel_round_deadline = window;
        self
    }

    pub fn with_sweep_interval(mut self, interval: std::time::Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_default_channels(mut self, channels: Vec<NotificationChannel>) -> Self {
        self.default_channels = channels;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GovernanceConfig::default();
        assert_eq!(config.max_veto_rounds, 3);
        assert_eq!(config.head_round_deadline, Duration::hours(24));
        assert_eq!(config.clevel_round_deadline, Duration::hours(12));
    }

    #[test]
    fn test_builder_chain() {
        let config = GovernanceConfig::default()
            .with_max_veto_rounds(1)
            .with_clevel_round_deadline(Duration::minutes(30))
            .with_default_channels(vec![NotificationChannel::Email]);
        assert_eq!(config.max_veto_rounds, 1);
        assert_eq!(config.clevel_round_deadline, Duration::minutes(30));
        assert_eq!(config.default_channels, vec![NotificationChannel::Email]);
    }
}
