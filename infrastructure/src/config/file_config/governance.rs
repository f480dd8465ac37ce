//! Governance configuration from TOML (`[governance]` section)

use boardroom_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw governance configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGovernanceConfig {
    /// Split HEAD evaluations tolerated before escalation
    pub max_veto_rounds: u32,
    /// Window for the first HEAD round, in hours
    pub head_round_deadline_hours: u64,
    /// Window for each C-level advisory round, in hours
    pub clevel_round_deadline_hours: u64,
    /// Deadline sweep period, in seconds
    pub sweep_interval_secs: u64,
}

impl Default for FileGovernanceConfig {
    fn default() -> Self {
        Self {
            max_veto_rounds: 3,
            head_round_deadline_hours: 24,
            clevel_round_deadline_hours: 12,
            sweep_interval_secs: 60,
        }
    }
}

impl FileGovernanceConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.max_veto_rounds == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroVetoRounds,
                "governance.max_veto_rounds = 0: every split HEAD vote escalates immediately",
            ));
        }
        for (field, hours) in [
            ("head_round_deadline_hours", self.head_round_deadline_hours),
            ("clevel_round_deadline_hours", self.clevel_round_deadline_hours),
        ] {
            if hours == 0 {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::ZeroRoundDeadline,
                    format!("governance.{field} = 0: rounds lapse on the next sweep"),
                ));
            }
        }
        if self.sweep_interval_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroSweepInterval,
                "governance.sweep_interval_secs must be at least 1",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_governance_deserialize() {
        let toml_str = r#"
[governance]
max_veto_rounds = 5
head_round_deadline_hours = 48
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.governance.max_veto_rounds, 5);
        assert_eq!(config.governance.head_round_deadline_hours, 48);
        assert_eq!(config.governance.clevel_round_deadline_hours, 12);
        assert_eq!(config.governance.sweep_interval_secs, 60);
    }

    #[test]
    fn test_zero_values_flagged() {
        let config = FileGovernanceConfig {
            max_veto_rounds: 0,
            head_round_deadline_hours: 0,
            clevel_round_deadline_hours: 12,
            sweep_interval_secs: 0,
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.code == ConfigIssueCode::ZeroVetoRounds && !i.is_fatal()));
        assert!(issues.iter().any(|i| i.code == ConfigIssueCode::ZeroSweepInterval && i.is_fatal()));
    }
}
