//! Typed message bodies.
//!
//! Each message type is a distinct [`MessageBody`] variant with its own
//! payload shape. [`MessageKind`] is the closed set of type tags the
//! orchestrator understands; anything else stays an opaque envelope.

use crate::core::error::DomainError;
use crate::core::ids::{AgentId, DecisionId, TaskId};
use crate::governance::{DecisionStatus, DecisionTier, NotificationChannel, Resolution, VoteValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Type tag of a message the orchestrator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    /// A new decision proposal.
    Decision,
    /// A ballot cast by a HEAD member or an advisory opinion from C-level.
    Vote,
    /// A request for votes (HEAD round) or analysis (C-level round).
    VoteRequest,
    /// Final outcome of a decision.
    DecisionResolved,
    /// Follow-up work handed to an agent.
    Task,
    /// Operational alert.
    Alert,
    StatusRequest,
    StatusResponse,
    /// Free-form announcement.
    Broadcast,
}

impl MessageKind {
    pub const ALL: [MessageKind; 9] = [
        MessageKind::Decision,
        MessageKind::Vote,
        MessageKind::VoteRequest,
        MessageKind::DecisionResolved,
        MessageKind::Task,
        MessageKind::Alert,
        MessageKind::StatusRequest,
        MessageKind::StatusResponse,
        MessageKind::Broadcast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Decision => "decision",
            MessageKind::Vote => "vote",
            MessageKind::VoteRequest => "vote_request",
            MessageKind::DecisionResolved => "decision_resolved",
            MessageKind::Task => "task",
            MessageKind::Alert => "alert",
            MessageKind::StatusRequest => "status_request",
            MessageKind::StatusResponse => "status_response",
            MessageKind::Broadcast => "broadcast",
        }
    }
}

impl FromStr for MessageKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::UnknownMessageType(s.to_string()))
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `decision` proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Raw tier tag; unknown or missing values fall back to `major`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub decision_type: Option<String>,
}

impl ProposalPayload {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            decision_type: None,
        }
    }

    pub fn with_tier(mut self, tier: DecisionTier) -> Self {
        self.decision_type = Some(tier.as_str().to_string());
        self
    }

    pub fn tier(&self) -> DecisionTier {
        DecisionTier::parse_or_default(self.decision_type.as_deref())
    }
}

/// Payload of a `vote`.
///
/// `voter_type` and `vote` stay strings on the wire; an unknown role or
/// value is a protocol-benign drop rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotePayload {
    pub decision_id: DecisionId,
    pub voter_type: String,
    pub vote: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl VotePayload {
    pub fn new(decision_id: DecisionId, voter: impl Into<String>, vote: VoteValue) -> Self {
        Self {
            decision_id,
            voter_type: voter.into(),
            vote: vote.as_str().to_string(),
            reasoning: None,
        }
    }

    /// Advisory opinion from a C-level member.
    pub fn opinion(
        decision_id: DecisionId,
        voter: impl Into<String>,
        opinion: impl Into<String>,
    ) -> Self {
        Self {
            decision_id,
            voter_type: voter.into(),
            vote: opinion.into(),
            reasoning: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

/// What a `vote_request` asks of its recipients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    /// HEAD members cast a binding vote.
    CastVote,
    /// C-level members provide advisory analysis on a split.
    ProvideAnalysis,
}

/// Payload of a `vote_request`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequestPayload {
    pub decision_id: DecisionId,
    pub title: String,
    pub description: String,
    pub proposed_by: AgentId,
    #[serde(rename = "type")]
    pub decision_type: DecisionTier,
    pub round: u32,
    pub action: VoteAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceo_vote: Option<VoteValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dao_vote: Option<VoteValue>,
}

/// Payload of a `decision_resolved` broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionPayload {
    pub decision_id: DecisionId,
    pub title: String,
    pub result: DecisionStatus,
    pub resolved_by: Resolution,
    pub veto_round: u32,
}

/// Payload of a `task` hand-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

/// Payload of an `alert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_id: Option<DecisionId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<NotificationChannel>,
}

/// Payload of a `status_response`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponsePayload {
    pub pending_decisions: usize,
    pub escalated_decisions: usize,
    pub pending_escalations: usize,
}

/// A decoded message body, one variant per [`MessageKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    Decision(ProposalPayload),
    Vote(VotePayload),
    VoteRequest(VoteRequestPayload),
    DecisionResolved(ResolutionPayload),
    Task(TaskPayload),
    Alert(AlertPayload),
    StatusRequest,
    StatusResponse(StatusResponsePayload),
    Broadcast(Value),
}

impl MessageBody {
    pub fn kind(&self) -> MessageKind {
        match self {
            MessageBody::Decision(_) => MessageKind::Decision,
            MessageBody::Vote(_) => MessageKind::Vote,
            MessageBody::VoteRequest(_) => MessageKind::VoteRequest,
            MessageBody::DecisionResolved(_) => MessageKind::DecisionResolved,
            MessageBody::Task(_) => MessageKind::Task,
            MessageBody::Alert(_) => MessageKind::Alert,
            MessageBody::StatusRequest => MessageKind::StatusRequest,
            MessageBody::StatusResponse(_) => MessageKind::StatusResponse,
            MessageBody::Broadcast(_) => MessageKind::Broadcast,
        }
    }

    /// Raw JSON payload for the envelope.
    pub fn to_payload(&self) -> Value {
        let encoded = match self {
            MessageBody::Decision(p) => serde_json::to_value(p),
            MessageBody::Vote(p) => serde_json::to_value(p),
            MessageBody::VoteRequest(p) => serde_json::to_value(p),
            MessageBody::DecisionResolved(p) => serde_json::to_value(p),
            MessageBody::Task(p) => serde_json::to_value(p),
            MessageBody::Alert(p) => serde_json::to_value(p),
            MessageBody::StatusRequest => Ok(Value::Object(Default::default())),
            MessageBody::StatusResponse(p) => serde_json::to_value(p),
            MessageBody::Broadcast(v) => Ok(v.clone()),
        };
        // Payload structs hold only strings, numbers and enums.
        encoded.unwrap_or_default()
    }

    /// Decode a raw payload as the body of `kind`.
    pub fn decode(kind: MessageKind, payload: &Value) -> Result<Self, DomainError> {
        let body = match kind {
            MessageKind::Decision => {
                let proposal: ProposalPayload = parse(kind, payload)?;
                if proposal.title.trim().is_empty() {
                    return Err(DomainError::MissingField("title"));
                }
                MessageBody::Decision(proposal)
            }
            MessageKind::Vote => MessageBody::Vote(parse(kind, payload)?),
            MessageKind::VoteRequest => MessageBody::VoteRequest(parse(kind, payload)?),
            MessageKind::DecisionResolved => MessageBody::DecisionResolved(parse(kind, payload)?),
            MessageKind::Task => MessageBody::Task(parse(kind, payload)?),
            MessageKind::Alert => MessageBody::Alert(parse(kind, payload)?),
            MessageKind::StatusRequest => MessageBody::StatusRequest,
            MessageKind::StatusResponse => MessageBody::StatusResponse(parse(kind, payload)?),
            MessageKind::Broadcast => MessageBody::Broadcast(payload.clone()),
        };
        Ok(body)
    }
}

fn parse<T: DeserializeOwned>(kind: MessageKind, payload: &Value) -> Result<T, DomainError> {
    T::deserialize(payload).map_err(|e| DomainError::MalformedPayload {
        kind: kind.as_str().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_tags_are_unique_and_parse_back() {
        for kind in MessageKind::ALL {
            assert_eq!(kind.as_str().parse::<MessageKind>().unwrap(), kind);
        }
        assert!("ping".parse::<MessageKind>().is_err());
    }

    #[test]
    fn test_decode_proposal_defaults_tier_to_major() {
        let body = MessageBody::decode(
            MessageKind::Decision,
            &json!({"title": "Hire CFO", "type": "galactic"}),
        )
        .unwrap();
        match body {
            MessageBody::Decision(p) => {
                assert_eq!(p.tier(), DecisionTier::Major);
                assert_eq!(p.description, "");
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_decode_proposal_requires_title() {
        let err = MessageBody::decode(MessageKind::Decision, &json!({"title": "  "})).unwrap_err();
        assert_eq!(err, DomainError::MissingField("title"));

        let err = MessageBody::decode(MessageKind::Decision, &json!({})).unwrap_err();
        assert!(matches!(err, DomainError::MalformedPayload { .. }));
    }

    #[test]
    fn test_decode_vote_keeps_raw_strings() {
        let body = MessageBody::decode(
            MessageKind::Vote,
            &json!({"decisionId": "d-1", "voterType": "intern", "vote": "maybe"}),
        )
        .unwrap();
        match body {
            MessageBody::Vote(v) => {
                assert_eq!(v.decision_id.as_str(), "d-1");
                assert_eq!(v.voter_type, "intern");
                assert_eq!(v.vote, "maybe");
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_vote_request_payload_shape() {
        let body = MessageBody::VoteRequest(VoteRequestPayload {
            decision_id: DecisionId::new("d-9"),
            title: "Expand".to_string(),
            description: String::new(),
            proposed_by: AgentId::new("cmo"),
            decision_type: DecisionTier::Minor,
            round: 2,
            action: VoteAction::ProvideAnalysis,
            ceo_vote: Some(VoteValue::Veto),
            dao_vote: Some(VoteValue::Approve),
        });
        let payload = body.to_payload();
        assert_eq!(payload["decisionId"], "d-9");
        assert_eq!(payload["type"], "minor");
        assert_eq!(payload["action"], "provide_analysis");
        assert_eq!(payload["ceoVote"], "veto");
        assert_eq!(payload["round"], 2);
    }
}
