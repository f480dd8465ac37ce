//! In-memory decision and escalation stores.
//!
//! State lives behind a single `tokio::sync::RwLock` per table, so every
//! write (vote, compare-and-swap, link) is atomic with respect to every other
//! write on the same table. Nothing survives a restart.

use async_trait::async_trait;
use boardroom_application::ports::decision_store::{CasOutcome, DecisionStore, StoreError};
use boardroom_application::ports::escalation_store::{EscalationStore, InsertOutcome, RespondOutcome};
use boardroom_domain::{
    AgentRole, Decision, DecisionId, DecisionStatus, Escalation, EscalationId, EscalationStatus,
    VoteValue,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

// ==================== Decisions ====================

/// Decision table keyed by id.
pub struct InMemoryDecisionStore {
    decisions: Arc<RwLock<HashMap<DecisionId, Decision>>>,
}

impl InMemoryDecisionStore {
    pub fn new() -> Self {
        Self {
            decisions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.decisions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.decisions.read().await.is_empty()
    }
}

impl Default for InMemoryDecisionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionStore for InMemoryDecisionStore {
    async fn insert(&self, decision: Decision) -> Result<Decision, StoreError> {
        let mut decisions = self.decisions.write().await;
        if decisions.contains_key(&decision.id) {
            return Err(StoreError::Duplicate(decision.id.to_string()));
        }
        decisions.insert(decision.id.clone(), decision.clone());
        Ok(decision)
    }

    async fn get(&self, id: &DecisionId) -> Result<Option<Decision>, StoreError> {
        Ok(self.decisions.read().await.get(id).cloned())
    }

    async fn list_by_status(&self, status: DecisionStatus) -> Result<Vec<Decision>, StoreError> {
        let decisions = self.decisions.read().await;
        let mut found: Vec<Decision> = decisions
            .values()
            .filter(|d| d.status == status)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn record_vote(
        &self,
        id: &DecisionId,
        role: AgentRole,
        vote: VoteValue,
        now: DateTime<Utc>,
    ) -> Result<Option<Decision>, StoreError> {
        let mut decisions = self.decisions.write().await;
        let Some(decision) = decisions.get_mut(id) else {
            return Ok(None);
        };
        if decision.is_terminal() {
            debug!(decision_id = %id, status = %decision.status, "Vote on terminal decision ignored");
            return Ok(Some(decision.clone()));
        }
        // Non-HEAD roles are filtered out by the caller; nothing to record here.
        if decision.set_head_vote(role, vote).is_ok() {
            decision.updated_at = now;
            decision.version += 1;
        }
        Ok(Some(decision.clone()))
    }

    async fn record_advisory(
        &self,
        id: &DecisionId,
        role: AgentRole,
        opinion: String,
        now: DateTime<Utc>,
    ) -> Result<Option<Decision>, StoreError> {
        let mut decisions = self.decisions.write().await;
        let Some(decision) = decisions.get_mut(id) else {
            return Ok(None);
        };
        decision.c_level_votes.insert(role, opinion);
        decision.updated_at = now;
        decision.version += 1;
        Ok(Some(decision.clone()))
    }

    async fn compare_and_swap(&self, mut next: Decision) -> Result<CasOutcome, StoreError> {
        let mut decisions = self.decisions.write().await;
        let Some(current) = decisions.get_mut(&next.id) else {
            return Ok(CasOutcome::Missing);
        };
        if current.version != next.version {
            return Ok(CasOutcome::Stale(current.clone()));
        }
        next.version += 1;
        *current = next.clone();
        Ok(CasOutcome::Committed(next))
    }

    async fn attach_escalation(
        &self,
        id: &DecisionId,
        escalation_id: EscalationId,
    ) -> Result<Option<Decision>, StoreError> {
        let mut decisions = self.decisions.write().await;
        let Some(decision) = decisions.get_mut(id) else {
            return Ok(None);
        };
        decision.escalation_id = Some(escalation_id);
        decision.version += 1;
        Ok(Some(decision.clone()))
    }
}

// ==================== Escalations ====================

/// Escalation table, kept in creation order.
pub struct InMemoryEscalationStore {
    escalations: Arc<RwLock<Vec<Escalation>>>,
}

impl InMemoryEscalationStore {
    pub fn new() -> Self {
        Self {
            escalations: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.escalations.read().await.len()
    }
}

impl Default for InMemoryEscalationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EscalationStore for InMemoryEscalationStore {
    async fn insert(&self, escalation: Escalation) -> Result<InsertOutcome, StoreError> {
        let mut escalations = self.escalations.write().await;
        if escalations.iter().any(|e| e.id == escalation.id) {
            return Err(StoreError::Duplicate(escalation.id.to_string()));
        }
        if let Some(decision_id) = &escalation.decision_id
            && let Some(existing) = escalations
                .iter()
                .find(|e| e.decision_id.as_ref() == Some(decision_id))
        {
            return Ok(InsertOutcome::Existing(existing.clone()));
        }
        escalations.push(escalation);
        Ok(InsertOutcome::Inserted)
    }

    async fn get(&self, id: &EscalationId) -> Result<Option<Escalation>, StoreError> {
        Ok(self
            .escalations
            .read()
            .await
            .iter()
            .find(|e| &e.id == id)
            .cloned())
    }

    async fn list_pending(&self) -> Result<Vec<Escalation>, StoreError> {
        Ok(self
            .escalations
            .read()
            .await
            .iter()
            .filter(|e| e.status == EscalationStatus::Pending)
            .cloned()
            .collect())
    }

    async fn respond(
        &self,
        id: &EscalationId,
        response: &str,
        now: DateTime<Utc>,
    ) -> Result<RespondOutcome, StoreError> {
        let mut escalations = self.escalations.write().await;
        let Some(escalation) = escalations.iter_mut().find(|e| &e.id == id) else {
            return Ok(RespondOutcome::Missing);
        };
        Ok(match escalation.resolve(response, now) {
            Ok(()) => RespondOutcome::Resolved(escalation.clone()),
            Err(_) => RespondOutcome::AlreadyResolved(escalation.clone()),
        })
    }
}
