//! Escalation store port

use super::decision_store::StoreError;
use async_trait::async_trait;
use boardroom_domain::{Escalation, EscalationId};
use chrono::{DateTime, Utc};

/// Result of recording a human response.
#[derive(Debug, Clone, PartialEq)]
pub enum RespondOutcome {
    Resolved(Escalation),
    /// The escalation was already resolved; carries the stored record.
    AlreadyResolved(Escalation),
    Missing,
}

/// Result of inserting an escalation.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted,
    /// A record for the same decision already exists; carries it.
    Existing(Escalation),
}

#[async_trait]
pub trait EscalationStore: Send + Sync {
    /// Insert a record. A decision has at most one escalation: when the
    /// record names a decision that already has one, nothing is written and
    /// the stored record is returned. The check and the write are atomic.
    async fn insert(&self, escalation: Escalation) -> Result<InsertOutcome, StoreError>;

    async fn get(&self, id: &EscalationId) -> Result<Option<Escalation>, StoreError>;

    /// Pending escalations, oldest first.
    async fn list_pending(&self) -> Result<Vec<Escalation>, StoreError>;

    /// Atomically record the human response and resolve.
    async fn respond(
        &self,
        id: &EscalationId,
        response: &str,
        now: DateTime<Utc>,
    ) -> Result<RespondOutcome, StoreError>;
}
