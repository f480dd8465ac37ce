//! Decision store port
//!
//! The store is the only shared mutable state of the governance protocol.
//! Its contract:
//!
//! - Every write bumps [`Decision::version`].
//! - [`DecisionStore::record_vote`] overwrites one HEAD ballot atomically and
//!   returns a consistent snapshot taken under the same lock.
//! - [`DecisionStore::compare_and_swap`] commits a new snapshot only if the
//!   stored version still equals the snapshot's version.
//!
//! Together these make convergence safe to evaluate redundantly: two
//! evaluators racing on the same snapshot both compute the same transition,
//! but only one commit succeeds.

use async_trait::async_trait;
use boardroom_domain::{AgentRole, Decision, DecisionId, DecisionStatus, EscalationId, VoteValue};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by persistence adapters
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Duplicate id: {0}")]
    Duplicate(String),
}

/// Result of a versioned commit.
#[derive(Debug, Clone, PartialEq)]
pub enum CasOutcome {
    /// The snapshot was stored; carries the stored value with its new version.
    Committed(Decision),
    /// Someone wrote first; carries the current stored value.
    Stale(Decision),
    /// No decision with that id.
    Missing,
}

#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Store a new decision. Fails with [`StoreError::Duplicate`] on id reuse.
    async fn insert(&self, decision: Decision) -> Result<Decision, StoreError>;

    async fn get(&self, id: &DecisionId) -> Result<Option<Decision>, StoreError>;

    /// All decisions in `status`, oldest first.
    async fn list_by_status(&self, status: DecisionStatus) -> Result<Vec<Decision>, StoreError>;

    /// Overwrite the ballot of a HEAD member and re-read.
    ///
    /// Leaves a terminal decision untouched and returns it as is. Returns
    /// `None` for an unknown id.
    async fn record_vote(
        &self,
        id: &DecisionId,
        role: AgentRole,
        vote: VoteValue,
        now: DateTime<Utc>,
    ) -> Result<Option<Decision>, StoreError>;

    /// Record an advisory opinion from a C-level member.
    async fn record_advisory(
        &self,
        id: &DecisionId,
        role: AgentRole,
        opinion: String,
        now: DateTime<Utc>,
    ) -> Result<Option<Decision>, StoreError>;

    /// Commit `next` if the stored version equals `next.version`.
    async fn compare_and_swap(&self, next: Decision) -> Result<CasOutcome, StoreError>;

    /// Link an escalation record to an escalated decision.
    async fn attach_escalation(
        &self,
        id: &DecisionId,
        escalation_id: EscalationId,
    ) -> Result<Option<Decision>, StoreError>;
}
