//! Escalation Manager use case
//!
//! Hands undecidable decisions and urgent alerts to a human.
//!
//! The record is the safety net, the notification is a courtesy: persisting
//! the [`Escalation`] must succeed or the caller gets a hard error, while a
//! failed notification is reported per channel and leaves the record intact.

use crate::ports::decision_store::StoreError;
use crate::ports::escalation_store::{EscalationStore, InsertOutcome, RespondOutcome};
use crate::ports::notifier::{NotifyError, Notifier};
use boardroom_domain::{DecisionId, Escalation, EscalationId, NotificationChannel};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that can occur in the escalation path
#[derive(Error, Debug)]
pub enum EscalationError {
    #[error("Failed to persist escalation: {0}")]
    Persist(#[source] StoreError),

    #[error("Escalation not found: {0}")]
    NotFound(EscalationId),

    #[error("Escalation {0} is already resolved")]
    AlreadyResolved(EscalationId),

    #[error("Escalation reason must not be empty")]
    EmptyReason,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for [`EscalationManager::trigger_escalation`]
#[derive(Debug, Clone, PartialEq)]
pub struct EscalationRequest {
    pub reason: String,
    pub decision_id: Option<DecisionId>,
    /// Channels to notify; empty means the configured defaults.
    pub channels: Vec<NotificationChannel>,
}

impl EscalationRequest {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            decision_id: None,
            channels: Vec::new(),
        }
    }

    pub fn for_decision(mut self, decision_id: DecisionId) -> Self {
        self.decision_id = Some(decision_id);
        self
    }

    pub fn with_channels(mut self, channels: Vec<NotificationChannel>) -> Self {
        self.channels = channels;
        self
    }
}

/// Result of a successful trigger.
#[derive(Debug)]
pub struct EscalationOutcome {
    pub escalation: Escalation,
    pub delivered: Vec<NotificationChannel>,
    pub failed: Vec<(NotificationChannel, NotifyError)>,
    /// The decision already had an escalation; nothing was written or sent.
    pub reused: bool,
}

impl EscalationOutcome {
    pub fn id(&self) -> &EscalationId {
        &self.escalation.id
    }

    pub fn fully_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct EscalationManager {
    store: Arc<dyn EscalationStore>,
    notifier: Arc<dyn Notifier>,
    default_channels: Vec<NotificationChannel>,
}

impl EscalationManager {
    pub fn new(
        store: Arc<dyn EscalationStore>,
        notifier: Arc<dyn Notifier>,
        default_channels: Vec<NotificationChannel>,
    ) -> Self {
        Self {
            store,
            notifier,
            default_channels,
        }
    }

    /// Persist an escalation, then notify each channel.
    pub async fn trigger_escalation(
        &self,
        request: EscalationRequest,
    ) -> Result<EscalationOutcome, EscalationError> {
        if request.reason.trim().is_empty() {
            return Err(EscalationError::EmptyReason);
        }
        let mut channels = if request.channels.is_empty() {
            self.default_channels.clone()
        } else {
            request.channels
        };
        channels.sort();
        channels.dedup();

        let escalation = Escalation::open(request.reason, request.decision_id, channels, Utc::now());
        match self.store.insert(escalation.clone()).await {
            Ok(InsertOutcome::Inserted) => {}
            Ok(InsertOutcome::Existing(existing)) => {
                // Whoever persisted the record owns the notifications.
                debug!(
                    escalation_id = %existing.id,
                    decision_id = ?existing.decision_id,
                    "Decision already escalated, reusing record"
                );
                return Ok(EscalationOutcome {
                    escalation: existing,
                    delivered: Vec::new(),
                    failed: Vec::new(),
                    reused: true,
                });
            }
            Err(e) => {
                error!(
                    decision_id = ?escalation.decision_id,
                    reason = %escalation.reason,
                    "Failed to persist escalation: {}",
                    e
                );
                return Err(EscalationError::Persist(e));
            }
        }
        info!(
            escalation_id = %escalation.id,
            decision_id = ?escalation.decision_id,
            "Escalated to human: {}",
            escalation.reason
        );

        let sends = escalation.channels_notified.iter().map(|&channel| {
            let notifier = Arc::clone(&self.notifier);
            let escalation = &escalation;
            async move { (channel, notifier.notify(channel, escalation).await) }
        });
        let mut delivered = Vec::new();
        let mut failed = Vec::new();
        for (channel, result) in join_all(sends).await {
            match result {
                Ok(()) => delivered.push(channel),
                Err(e) => {
                    warn!(
                        escalation_id = %escalation.id,
                        channel = %channel,
                        "Escalation notification failed: {}",
                        e
                    );
                    failed.push((channel, e));
                }
            }
        }

        Ok(EscalationOutcome {
            escalation,
            delivered,
            failed,
            reused: false,
        })
    }

    /// Record a human's response. Never touches the linked decision.
    pub async fn respond_to_escalation(
        &self,
        id: &EscalationId,
        response: &str,
    ) -> Result<Escalation, EscalationError> {
        match self.store.respond(id, response, Utc::now()).await? {
            RespondOutcome::Resolved(escalation) => {
                info!(escalation_id = %id, "Escalation resolved by human");
                Ok(escalation)
            }
            RespondOutcome::AlreadyResolved(_) => Err(EscalationError::AlreadyResolved(id.clone())),
            RespondOutcome::Missing => Err(EscalationError::NotFound(id.clone())),
        }
    }

    pub async fn get(&self, id: &EscalationId) -> Result<Option<Escalation>, EscalationError> {
        Ok(self.store.get(id).await?)
    }

    pub async fn pending(&self) -> Result<Vec<Escalation>, EscalationError> {
        Ok(self.store.list_pending().await?)
    }
}
