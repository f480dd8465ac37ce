//! In-memory port implementations shared by the use case tests.

use crate::ports::audit_log::{AuditError, AuditLog};
use crate::ports::channel_bus::{BusError, ChannelBus, MessageSink, Subscription};
use crate::ports::decision_store::{CasOutcome, DecisionStore, StoreError};
use crate::ports::escalation_store::{EscalationStore, InsertOutcome, RespondOutcome};
use crate::ports::notifier::{NotifyError, Notifier};
use crate::ports::task_queue::TaskQueue;
use async_trait::async_trait;
use boardroom_domain::{
    AgentId, AgentMessage, AgentRole, AuditEvent, Channel, Decision, DecisionId, DecisionStatus,
    Escalation, EscalationId, EscalationStatus, MessageKind, NotificationChannel, QueuedTask,
    VoteValue,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

// ==================== Decision store ====================

#[derive(Default)]
pub struct MockDecisionStore {
    pub decisions: Mutex<HashMap<DecisionId, Decision>>,
    /// When set, the next CAS reports `Stale` after applying this vote.
    pub interleave: Mutex<Option<(AgentRole, VoteValue)>>,
}

impl MockDecisionStore {
    pub fn snapshot(&self, id: &DecisionId) -> Decision {
        self.decisions.lock().unwrap()[id].clone()
    }
}

#[async_trait]
impl DecisionStore for MockDecisionStore {
    async fn insert(&self, decision: Decision) -> Result<Decision, StoreError> {
        self.decisions
            .lock()
            .unwrap()
            .insert(decision.id.clone(), decision.clone());
        Ok(decision)
    }

    async fn get(&self, id: &DecisionId) -> Result<Option<Decision>, StoreError> {
        Ok(self.decisions.lock().unwrap().get(id).cloned())
    }

    async fn list_by_status(&self, status: DecisionStatus) -> Result<Vec<Decision>, StoreError> {
        let mut found: Vec<_> = self
            .decisions
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.status == status)
            .cloned()
            .collect();
        found.sort_by_key(|d| d.created_at);
        Ok(found)
    }

    async fn record_vote(
        &self,
        id: &DecisionId,
        role: AgentRole,
        vote: VoteValue,
        now: DateTime<Utc>,
    ) -> Result<Option<Decision>, StoreError> {
        let mut decisions = self.decisions.lock().unwrap();
        let Some(decision) = decisions.get_mut(id) else {
            return Ok(None);
        };
        if !decision.is_terminal() {
            decision.set_head_vote(role, vote).ok();
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
        let mut decisions = self.decisions.lock().unwrap();
        let Some(decision) = decisions.get_mut(id) else {
            return Ok(None);
        };
        decision.c_level_votes.insert(role, opinion);
        decision.updated_at = now;
        decision.version += 1;
        Ok(Some(decision.clone()))
    }

    async fn compare_and_swap(&self, mut next: Decision) -> Result<CasOutcome, StoreError> {
        let mut decisions = self.decisions.lock().unwrap();
        let Some(current) = decisions.get_mut(&next.id) else {
            return Ok(CasOutcome::Missing);
        };
        if let Some((role, vote)) = self.interleave.lock().unwrap().take() {
            current.set_head_vote(role, vote).ok();
            current.version += 1;
        }
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
        let mut decisions = self.decisions.lock().unwrap();
        let Some(decision) = decisions.get_mut(id) else {
            return Ok(None);
        };
        decision.escalation_id = Some(escalation_id);
        decision.version += 1;
        Ok(Some(decision.clone()))
    }
}

// ==================== Escalation store ====================

#[derive(Default)]
pub struct MockEscalationStore {
    pub escalations: Mutex<Vec<Escalation>>,
    pub fail_inserts: Mutex<bool>,
}

#[async_trait]
impl EscalationStore for MockEscalationStore {
    async fn insert(&self, escalation: Escalation) -> Result<InsertOutcome, StoreError> {
        if *self.fail_inserts.lock().unwrap() {
            return Err(StoreError::Unavailable("escalation table offline".to_string()));
        }
        let mut escalations = self.escalations.lock().unwrap();
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
            .lock()
            .unwrap()
            .iter()
            .find(|e| &e.id == id)
            .cloned())
    }

    async fn list_pending(&self) -> Result<Vec<Escalation>, StoreError> {
        Ok(self
            .escalations
            .lock()
            .unwrap()
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
        let mut escalations = self.escalations.lock().unwrap();
        let Some(escalation) = escalations.iter_mut().find(|e| &e.id == id) else {
            return Ok(RespondOutcome::Missing);
        };
        match escalation.resolve(response, now) {
            Ok(()) => Ok(RespondOutcome::Resolved(escalation.clone())),
            Err(_) => Ok(RespondOutcome::AlreadyResolved(escalation.clone())),
        }
    }
}

// ==================== Bus ====================

/// Records publishes without delivering them.
#[derive(Default)]
pub struct RecordingBus {
    pub published: Mutex<Vec<(Channel, AgentMessage)>>,
}

impl RecordingBus {
    pub fn on(&self, channel: &Channel, kind: MessageKind) -> Vec<AgentMessage> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, m)| c == channel && m.kind() == Some(kind))
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn count(&self, kind: MessageKind) -> usize {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, m)| m.kind() == Some(kind))
            .count()
    }
}

#[async_trait]
impl ChannelBus for RecordingBus {
    async fn publish(&self, channel: &Channel, message: &AgentMessage) -> Result<usize, BusError> {
        self.published
            .lock()
            .unwrap()
            .push((channel.clone(), message.clone()));
        Ok(0)
    }

    fn subscribe(
        &self,
        channel: &Channel,
        _sink: Arc<dyn MessageSink>,
        parent: &CancellationToken,
    ) -> Subscription {
        Subscription::new(channel.clone(), parent.child_token())
    }
}

// ==================== Notifier / audit / queue ====================

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(NotificationChannel, EscalationId)>>,
    pub failing: Mutex<Vec<NotificationChannel>>,
    /// Simulated delivery latency.
    pub delay: Mutex<Option<std::time::Duration>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        channel: NotificationChannel,
        escalation: &Escalation,
    ) -> Result<(), NotifyError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&channel) {
            return Err(NotifyError::Delivery {
                channel,
                reason: "gateway timeout".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel, escalation.id.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAudit {
    pub events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditLog for MemoryAudit {
    async fn append(&self, event: AuditEvent) -> Result<(), AuditError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryQueue {
    pub queues: Mutex<HashMap<AgentId, VecDeque<QueuedTask>>>,
}

#[async_trait]
impl TaskQueue for MemoryQueue {
    async fn push(&self, task: QueuedTask) -> Result<(), StoreError> {
        self.queues
            .lock()
            .unwrap()
            .entry(task.agent.clone())
            .or_default()
            .push_back(task);
        Ok(())
    }

    async fn pop(&self, agent: &AgentId) -> Result<Option<QueuedTask>, StoreError> {
        Ok(self
            .queues
            .lock()
            .unwrap()
            .get_mut(agent)
            .and_then(|q| q.pop_front()))
    }

    async fn len(&self, agent: &AgentId) -> Result<usize, StoreError> {
        Ok(self.queues.lock().unwrap().get(agent).map_or(0, |q| q.len()))
    }
}
