//! Message handlers for the orchestrator's protocol.
//!
//! Thin adapters from decoded [`MessageBody`] variants onto the use cases.
//! [`register_protocol_handlers`] installs all of them in a registry.

use crate::dispatcher::{HandlerError, HandlerRegistry, MessageHandler};
use crate::ports::channel_bus::ChannelBus;
use crate::ports::task_queue::TaskQueue;
use crate::use_cases::escalation::EscalationRequest;
use crate::use_cases::governance::GovernanceService;
use async_trait::async_trait;
use boardroom_domain::{
    AgentId, AgentMessage, Channel, MessageBody, MessageKind, Priority, QueuedTask, Recipient,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// `decision` → create a decision and request HEAD votes.
pub struct ProposalHandler {
    governance: Arc<GovernanceService>,
}

#[async_trait]
impl MessageHandler for ProposalHandler {
    async fn handle(&self, message: &AgentMessage, body: MessageBody) -> Result<(), HandlerError> {
        let MessageBody::Decision(proposal) = body else {
            return Err(HandlerError::UnexpectedBody(body.kind()));
        };
        self.governance.propose(&message.from, proposal).await?;
        Ok(())
    }
}

/// `vote` → record the ballot and re-evaluate.
pub struct VoteHandler {
    governance: Arc<GovernanceService>,
}

#[async_trait]
impl MessageHandler for VoteHandler {
    async fn handle(&self, _message: &AgentMessage, body: MessageBody) -> Result<(), HandlerError> {
        let MessageBody::Vote(vote) = body else {
            return Err(HandlerError::UnexpectedBody(body.kind()));
        };
        self.governance.cast_vote(vote).await?;
        Ok(())
    }
}

/// `alert` → escalate urgent and critical alerts, log the rest.
pub struct AlertHandler {
    governance: Arc<GovernanceService>,
}

#[async_trait]
impl MessageHandler for AlertHandler {
    async fn handle(&self, message: &AgentMessage, body: MessageBody) -> Result<(), HandlerError> {
        let MessageBody::Alert(alert) = body else {
            return Err(HandlerError::UnexpectedBody(body.kind()));
        };
        if message.priority < Priority::Urgent {
            info!(
                from = %message.from,
                priority = message.priority.as_str(),
                "Alert: {}",
                alert.title
            );
            return Ok(());
        }

        let reason = match &alert.details {
            Some(details) => format!("Alert from {}: {} ({})", message.from, alert.title, details),
            None => format!("Alert from {}: {}", message.from, alert.title),
        };
        let mut request = EscalationRequest::new(reason).with_channels(alert.channels);
        if let Some(decision_id) = alert.decision_id {
            request = request.for_decision(decision_id);
        }
        self.governance
            .escalations()
            .trigger_escalation(request)
            .await?;
        Ok(())
    }
}

/// `status_request` → reply on the requester's channel with counts.
pub struct StatusHandler {
    governance: Arc<GovernanceService>,
    bus: Arc<dyn ChannelBus>,
}

#[async_trait]
impl MessageHandler for StatusHandler {
    async fn handle(&self, message: &AgentMessage, _body: MessageBody) -> Result<(), HandlerError> {
        let counts = self.governance.status_counts().await?;
        let reply = AgentMessage::new(
            AgentId::orchestrator(),
            Recipient::Agent(message.from.clone()),
            MessageBody::StatusResponse(counts),
        );
        self.bus
            .publish(&Channel::Agent(message.from.clone()), &reply)
            .await?;
        Ok(())
    }
}

/// `task` → push onto the addressed agent's queue.
pub struct TaskHandler {
    queue: Arc<dyn TaskQueue>,
}

#[async_trait]
impl MessageHandler for TaskHandler {
    async fn handle(&self, message: &AgentMessage, body: MessageBody) -> Result<(), HandlerError> {
        let MessageBody::Task(payload) = body else {
            return Err(HandlerError::UnexpectedBody(body.kind()));
        };
        let Some(agent) = message.to.agent() else {
            warn!(
                message_id = %message.id,
                to = %String::from(message.to.clone()),
                "Task addressed to a group, dropping"
            );
            return Ok(());
        };
        let task = QueuedTask::from_payload(
            payload,
            agent.clone(),
            message.from.clone(),
            Some(message.id.clone()),
            Utc::now(),
        );
        info!(task_id = %task.id, agent = %agent, "Task queued: {}", task.title);
        self.queue.push(task).await?;
        Ok(())
    }
}

/// Install the orchestrator's handlers for every kind it consumes.
///
/// `vote_request`, `decision_resolved`, `status_response` and `broadcast`
/// are outbound kinds; they stay unregistered and are audited only.
pub fn register_protocol_handlers(
    registry: &mut HandlerRegistry,
    governance: Arc<GovernanceService>,
    bus: Arc<dyn ChannelBus>,
    queue: Arc<dyn TaskQueue>,
) {
    registry.register(
        MessageKind::Decision,
        Arc::new(ProposalHandler {
            governance: Arc::clone(&governance),
        }),
    );
    registry.register(
        MessageKind::Vote,
        Arc::new(VoteHandler {
            governance: Arc::clone(&governance),
        }),
    );
    registry.register(
        MessageKind::Alert,
        Arc::new(AlertHandler {
            governance: Arc::clone(&governance),
        }),
    );
    registry.register(
        MessageKind::StatusRequest,
        Arc::new(StatusHandler { governance, bus }),
    );
    registry.register(MessageKind::Task, Arc::new(TaskHandler { queue }));
}
