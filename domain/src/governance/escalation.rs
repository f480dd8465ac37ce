//! Human arbitration records.

use crate::core::error::DomainError;
use crate::core::ids::{DecisionId, EscalationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Out-of-band channel used to reach a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Telegram,
    Email,
    Dashboard,
    Webhook,
}

impl NotificationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationChannel::Telegram => "telegram",
            NotificationChannel::Email => "email",
            NotificationChannel::Dashboard => "dashboard",
            NotificationChannel::Webhook => "webhook",
        }
    }
}

impl FromStr for NotificationChannel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "telegram" => Ok(NotificationChannel::Telegram),
            "email" => Ok(NotificationChannel::Email),
            "dashboard" => Ok(NotificationChannel::Dashboard),
            "webhook" => Ok(NotificationChannel::Webhook),
            other => Err(DomainError::InvalidChannel(other.to_string())),
        }
    }
}

impl std::fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscalationStatus {
    #[default]
    Pending,
    Resolved,
}

/// A request for human arbitration.
///
/// May be linked to a decision (deadlock, lapsed deadline) or free-standing
/// (critical alert, manual trigger). Resolving an escalation never changes
/// the linked decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Escalation {
    pub id: EscalationId,
    pub decision_id: Option<DecisionId>,
    pub reason: String,
    pub channels_notified: Vec<NotificationChannel>,
    pub human_response: Option<String>,
    pub status: EscalationStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Escalation {
    pub fn open(
        reason: impl Into<String>,
        decision_id: Option<DecisionId>,
        channels: Vec<NotificationChannel>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EscalationId::generate(),
            decision_id,
            reason: reason.into(),
            channels_notified: channels,
            human_response: None,
            status: EscalationStatus::Pending,
            created_at: now,
            resolved_at: None,
        }
    }

    /// Record the human's response and close the escalation.
    pub fn resolve(
        &mut self,
        response: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.status == EscalationStatus::Resolved {
            return Err(DomainError::AlreadyResolved(self.id.to_string()));
        }
        self.human_response = Some(response.into());
        self.status = EscalationStatus::Resolved;
        self.resolved_at = Some(now);
        Ok(())
    }
}
