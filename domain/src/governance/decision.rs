//! The [`Decision`] entity and its status model.

use super::vote::VoteValue;
use crate::agent::AgentRole;
use crate::core::error::DomainError;
use crate::core::ids::{AgentId, DecisionId, EscalationId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Advisory stakes classification set by the proposer.
///
/// The tier is metadata only; it does not change protocol mechanics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionTier {
    Operational,
    Minor,
    #[default]
    Major,
    Critical,
}

impl DecisionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionTier::Operational => "operational",
            DecisionTier::Minor => "minor",
            DecisionTier::Major => "major",
            DecisionTier::Critical => "critical",
        }
    }

    /// Parse a raw tier tag, falling back to `major` for anything unknown.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("operational") => DecisionTier::Operational,
            Some("minor") => DecisionTier::Minor,
            Some("critical") => DecisionTier::Critical,
            _ => DecisionTier::Major,
        }
    }
}

/// Lifecycle status of a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    #[default]
    Pending,
    Approved,
    Vetoed,
    Escalated,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Pending => "pending",
            DecisionStatus::Approved => "approved",
            DecisionStatus::Vetoed => "vetoed",
            DecisionStatus::Escalated => "escalated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DecisionStatus::Pending)
    }
}

impl std::fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a decision left `pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// HEAD members converged on the same vote.
    Consensus,
    /// A human operator overrode the protocol.
    Human {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// HEAD members stayed split through the last allowed round.
    Deadlock,
    /// The current round's deadline passed without convergence.
    DeadlineLapsed,
}

impl Resolution {
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Consensus => "consensus",
            Resolution::Human { .. } => "human",
            Resolution::Deadlock => "deadlock",
            Resolution::DeadlineLapsed => "deadline_lapsed",
        }
    }
}

/// A governance unit under vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: DecisionId,
    pub title: String,
    pub description: String,
    pub proposed_by: AgentId,
    pub decision_type: DecisionTier,
    pub status: DecisionStatus,
    pub veto_round: u32,
    pub ceo_vote: Option<VoteValue>,
    pub dao_vote: Option<VoteValue>,
    /// Advisory opinions from C-level members; never gates the outcome.
    pub c_level_votes: BTreeMap<AgentRole, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    /// Instant after which the deadline sweep acts on a pending decision.
    pub round_deadline: DateTime<Utc>,
    pub resolution: Option<Resolution>,
    pub escalation_id: Option<EscalationId>,
    /// Optimistic concurrency counter, bumped by the store on every write.
    pub version: u64,
}

impl Decision {
    /// Create a freshly proposed decision awaiting the first HEAD round.
    pub fn propose(
        title: impl Into<String>,
        description: impl Into<String>,
        proposed_by: AgentId,
        decision_type: DecisionTier,
        now: DateTime<Utc>,
        head_round_window: Duration,
    ) -> Self {
        Self {
            id: DecisionId::generate(),
            title: title.into(),
            description: description.into(),
            proposed_by,
            decision_type,
            status: DecisionStatus::Pending,
            veto_round: 0,
            ceo_vote: None,
            dao_vote: None,
            c_level_votes: BTreeMap::new(),
            created_at: now,
            updated_at: now,
            resolved_at: None,
            round_deadline: now + head_round_window,
            resolution: None,
            escalation_id: None,
            version: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn head_vote(&self, role: AgentRole) -> Option<VoteValue> {
        match role {
            AgentRole::Ceo => self.ceo_vote,
            AgentRole::Dao => self.dao_vote,
            _ => None,
        }
    }

    /// Overwrite the ballot of a HEAD member.
    pub fn set_head_vote(&mut self, role: AgentRole, vote: VoteValue) -> Result<(), DomainError> {
        match role {
            AgentRole::Ceo => self.ceo_vote = Some(vote),
            AgentRole::Dao => self.dao_vote = Some(vote),
            other => return Err(DomainError::UnknownVoter(other.to_string())),
        }
        Ok(())
    }

    /// Both HEAD ballots, once both are present.
    pub fn head_votes(&self) -> Option<(VoteValue, VoteValue)> {
        Some((self.ceo_vote?, self.dao_vote?))
    }

    pub fn deadline_lapsed(&self, now: DateTime<Utc>) -> bool {
        !self.is_terminal() && now >= self.round_deadline
    }

    /// Whether the decision is escalated but no escalation record is linked.
    pub fn needs_escalation_record(&self) -> bool {
        self.status == DecisionStatus::Escalated && self.escalation_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Decision {
        Decision::propose(
            "Launch campaign",
            "Q3 growth push",
            AgentId::new("cmo"),
            DecisionTier::Minor,
            Utc::now(),
            Duration::hours(24),
        )
    }

    #[test]
    fn test_propose_starts_pending_at_round_zero() {
        let decision = proposal();
        assert_eq!(decision.status, DecisionStatus::Pending);
        assert_eq!(decision.veto_round, 0);
        assert_eq!(decision.version, 0);
        assert!(decision.head_votes().is_none());
        assert_eq!(
            decision.round_deadline - decision.created_at,
            Duration::hours(24)
        );
    }

    #[test]
    fn test_set_head_vote_overwrites() {
        let mut decision = proposal();
        decision.set_head_vote(AgentRole::Ceo, VoteValue::Veto).unwrap();
        decision.set_head_vote(AgentRole::Ceo, VoteValue::Approve).unwrap();
        assert_eq!(decision.head_vote(AgentRole::Ceo), Some(VoteValue::Approve));
        assert!(decision.set_head_vote(AgentRole::Cfo, VoteValue::Approve).is_err());
    }

    #[test]
    fn test_tier_parse_or_default() {
        assert_eq!(DecisionTier::parse_or_default(Some("Minor")), DecisionTier::Minor);
        assert_eq!(DecisionTier::parse_or_default(Some("huge")), DecisionTier::Major);
        assert_eq!(DecisionTier::parse_or_default(None), DecisionTier::Major);
    }

    #[test]
    fn test_deadline_lapsed_only_while_pending() {
        let mut decision = proposal();
        let later = decision.round_deadline + Duration::seconds(1);
        assert!(decision.deadline_lapsed(later));
        decision.status = DecisionStatus::Approved;
        assert!(!decision.deadline_lapsed(later));
    }

    #[test]
    fn test_decision_json_is_camel_case() {
        let mut decision = proposal();
        decision.c_level_votes.insert(AgentRole::Cfo, "budget is tight".to_string());
        let value = serde_json::to_value(&decision).unwrap();
        assert_eq!(value["proposedBy"], "cmo");
        assert_eq!(value["decisionType"], "minor");
        assert_eq!(value["vetoRound"], 0);
        assert_eq!(value["cLevelVotes"]["cfo"], "budget is tight");
    }
}
