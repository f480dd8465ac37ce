//! Escalation configuration from TOML (`[escalation]` section)

use boardroom_domain::{ConfigIssue, ConfigIssueCode, NotificationChannel};
use serde::{Deserialize, Serialize};

/// Raw escalation configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEscalationConfig {
    /// Channels used when an escalation names none
    /// ("telegram", "email", "dashboard", "webhook")
    pub default_channels: Vec<String>,
    /// Target for the webhook channel
    pub webhook_url: Option<String>,
}

impl Default for FileEscalationConfig {
    fn default() -> Self {
        Self {
            default_channels: vec!["dashboard".to_string()],
            webhook_url: None,
        }
    }
}

impl FileEscalationConfig {
    /// Parse `default_channels`, skipping unknown names.
    ///
    /// Falls back to `dashboard` when nothing valid remains.
    pub fn parse_default_channels(&self) -> (Vec<NotificationChannel>, Vec<ConfigIssue>) {
        let mut channels = Vec::new();
        let mut issues = Vec::new();

        for raw in &self.default_channels {
            match raw.parse::<NotificationChannel>() {
                Ok(channel) => channels.push(channel),
                Err(_) => issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "escalation.default_channels".to_string(),
                        value: raw.clone(),
                        valid_values: ["telegram", "email", "dashboard", "webhook"]
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    },
                    format!("escalation.default_channels: unknown channel '{raw}', skipping"),
                )),
            }
        }
        channels.sort();
        channels.dedup();
        if channels.is_empty() {
            channels.push(NotificationChannel::Dashboard);
        }

        if channels.contains(&NotificationChannel::Webhook) && self.webhook_url.is_none() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingWebhookUrl,
                "escalation.default_channels includes 'webhook' but escalation.webhook_url is not set; webhook notices are only logged",
            ));
        }

        (channels, issues)
    }
}
