//! Audit events.
//!
//! Every message that reaches the dispatcher produces exactly one
//! [`AuditEvent`], whether or not a handler exists for its type. Human
//! overrides write an additional `human_decision` event.

use crate::core::ids::{AgentId, MessageId};
use crate::message::AgentMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event type written for a human override.
pub const HUMAN_DECISION_EVENT: &str = "human_decision";

/// A single append-only audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub event_type: String,
    pub source_agent: AgentId,
    /// Present only when the message was addressed to a single agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_agent: Option<AgentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        event_type: impl Into<String>,
        source_agent: AgentId,
        payload: Value,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            source_agent,
            target_agent: None,
            message_id: None,
            payload,
            timestamp,
        }
    }

    /// Audit record for an inbound message, keyed by its raw type tag.
    pub fn from_message(message: &AgentMessage, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_type: message.message_type.clone(),
            source_agent: message.from.clone(),
            target_agent: message.to.agent().cloned(),
            message_id: Some(message.id.clone()),
            payload: message.payload.clone(),
            timestamp,
        }
    }
}
