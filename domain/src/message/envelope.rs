//! The [`AgentMessage`] envelope exchanged over the channel bus.
//!
//! The envelope keeps `type` as an open string and `payload` as raw JSON so
//! that messages of unknown type survive transport and can still be audited.
//! Typed access goes through [`AgentMessage::body`].

use super::body::{MessageBody, MessageKind};
use super::channel::Channel;
use crate::core::error::DomainError;
use crate::core::ids::{AgentId, MessageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Delivery priority of a message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
            Priority::Critical => "critical",
        }
    }
}

/// Addressee of a message: one agent or a logical group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recipient {
    Agent(AgentId),
    Head,
    CLevel,
    All,
}

impl Recipient {
    /// The single agent addressed, if the recipient is scalar.
    pub fn agent(&self) -> Option<&AgentId> {
        match self {
            Recipient::Agent(id) => Some(id),
            _ => None,
        }
    }

    /// Channel a message for this recipient is normally published on.
    pub fn channel(&self) -> Channel {
        match self {
            Recipient::Agent(id) => Channel::Agent(id.clone()),
            Recipient::Head => Channel::Head,
            Recipient::CLevel => Channel::CLevel,
            Recipient::All => Channel::Broadcast,
        }
    }
}

impl From<String> for Recipient {
    fn from(s: String) -> Self {
        match s.as_str() {
            "head" => Recipient::Head,
            "clevel" | "c-level" => Recipient::CLevel,
            "all" => Recipient::All,
            _ => Recipient::Agent(AgentId::from(s)),
        }
    }
}

impl From<&str> for Recipient {
    fn from(s: &str) -> Self {
        Recipient::from(s.to_string())
    }
}

impl From<Recipient> for String {
    fn from(r: Recipient) -> Self {
        match r {
            Recipient::Agent(id) => id.as_str().to_string(),
            Recipient::Head => "head".to_string(),
            Recipient::CLevel => "clevel".to_string(),
            Recipient::All => "all".to_string(),
        }
    }
}

impl From<AgentId> for Recipient {
    fn from(id: AgentId) -> Self {
        Recipient::Agent(id)
    }
}

/// The unit of communication between agents and the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    pub id: MessageId,
    #[serde(rename = "type")]
    pub message_type: String,
    pub from: AgentId,
    pub to: Recipient,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub priority: Priority,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub requires_response: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_deadline: Option<DateTime<Utc>>,
}

impl AgentMessage {
    /// Build a message from a typed body.
    pub fn new(from: impl Into<AgentId>, to: impl Into<Recipient>, body: MessageBody) -> Self {
        Self {
            id: MessageId::generate(),
            message_type: body.kind().as_str().to_string(),
            from: from.into(),
            to: to.into(),
            payload: body.to_payload(),
            priority: Priority::Normal,
            timestamp: Utc::now(),
            requires_response: false,
            response_deadline: None,
        }
    }

    /// Build a message with an arbitrary type tag and raw payload.
    pub fn raw(
        message_type: impl Into<String>,
        from: impl Into<AgentId>,
        to: impl Into<Recipient>,
        payload: Value,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            message_type: message_type.into(),
            from: from.into(),
            to: to.into(),
            payload,
            priority: Priority::Normal,
            timestamp: Utc::now(),
            requires_response: false,
            response_deadline: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Mark the message as expecting a reply by `deadline` (advisory only).
    pub fn with_response_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.requires_response = true;
        self.response_deadline = Some(deadline);
        self
    }

    /// Known kind of this message, or `None` for an unrecognized type tag.
    pub fn kind(&self) -> Option<MessageKind> {
        self.message_type.parse().ok()
    }

    /// Decode the typed body.
    pub fn body(&self) -> Result<MessageBody, DomainError> {
        let kind = self
            .kind()
            .ok_or_else(|| DomainError::UnknownMessageType(self.message_type.clone()))?;
        MessageBody::decode(kind, &self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::body::ProposalPayload;
    use serde_json::json;

    #[test]
    fn test_recipient_wire_format() {
        assert_eq!(Recipient::from("head".to_string()), Recipient::Head);
        assert_eq!(Recipient::from("c-level".to_string()), Recipient::CLevel);
        assert_eq!(
            Recipient::from("cmo".to_string()),
            Recipient::Agent(AgentId::new("cmo"))
        );
        assert_eq!(String::from(Recipient::All), "all");
    }

    #[test]
    fn test_message_json_shape() {
        let message = AgentMessage::new(
            "cmo",
            Recipient::Agent(AgentId::orchestrator()),
            MessageBody::Decision(ProposalPayload::new("Launch campaign", "Q3 push")),
        )
        .with_priority(Priority::High);

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "decision");
        assert_eq!(value["from"], "cmo");
        assert_eq!(value["to"], "orchestrator");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["requiresResponse"], false);
        assert_eq!(value["payload"]["title"], "Launch campaign");
        assert!(value.get("responseDeadline").is_none());
    }

    #[test]
    fn test_unknown_type_survives_deserialization() {
        let value = json!({
            "id": "m-1",
            "type": "heartbeat",
            "from": "cto",
            "to": "all",
            "payload": {"uptime": 42},
            "timestamp": "2026-01-01T00:00:00Z"
        });
        let message: AgentMessage = serde_json::from_value(value).unwrap();
        assert_eq!(message.kind(), None);
        assert_eq!(message.priority, Priority::Normal);
        assert!(matches!(
            message.body(),
            Err(DomainError::UnknownMessageType(t)) if t == "heartbeat"
        ));
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Critical > Priority::Urgent);
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::Low < Priority::Normal);
    }
}
