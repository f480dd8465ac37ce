//! Dependency injection: builds the running system from configuration.

use anyhow::{Context, Result};
use boardroom_application::{
    AuditLog, ChannelBus, Dispatcher, EscalationManager, GovernanceConfig, GovernanceService,
    HandlerRegistry, Notifier, TaskQueue, register_protocol_handlers,
};
use boardroom_domain::{Channel, NotificationChannel};
use boardroom_infrastructure::{
    FileConfig, FileTaskQueue, InMemoryAuditLog, InMemoryChannelBus, InMemoryDecisionStore,
    InMemoryEscalationStore, InMemoryTaskQueue, JsonlAuditLog, LogNotifier, RoutingNotifier,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// The wired orchestrator.
pub struct Services {
    pub bus: Arc<dyn ChannelBus>,
    pub governance: Arc<GovernanceService>,
    pub dispatcher: Arc<Dispatcher>,
    pub config: GovernanceConfig,
}

impl Services {
    pub fn build(file: &FileConfig, config: GovernanceConfig) -> Result<Self> {
        let bus: Arc<dyn ChannelBus> = Arc::new(InMemoryChannelBus::new(file.bus.channel_capacity));
        let audit = audit_log(file)?;
        let queue = task_queue(file)?;

        let escalations = Arc::new(EscalationManager::new(
            Arc::new(InMemoryEscalationStore::new()),
            notifier(file)?,
            config.default_channels.clone(),
        ));
        let governance = Arc::new(GovernanceService::new(
            Arc::new(InMemoryDecisionStore::new()),
            bus.clone(),
            escalations,
            audit.clone(),
            config.clone(),
        ));

        let mut registry = HandlerRegistry::new();
        register_protocol_handlers(&mut registry, governance.clone(), bus.clone(), queue);
        info!(handlers = registry.len(), "Protocol handlers registered");
        let dispatcher = Arc::new(Dispatcher::new(registry, audit));

        Ok(Self {
            bus,
            governance,
            dispatcher,
            config,
        })
    }

    /// Route orchestrator-channel traffic into the dispatcher.
    pub fn start_dispatch(&self, token: &CancellationToken) {
        self.bus
            .subscribe(&Channel::Orchestrator, self.dispatcher.clone(), token);
    }
}

fn audit_log(file: &FileConfig) -> Result<Arc<dyn AuditLog>> {
    Ok(match &file.audit.path {
        Some(path) => {
            let log = JsonlAuditLog::open(path)
                .with_context(|| format!("Failed to open audit log {}", path.display()))?;
            info!(path = %path.display(), "Audit log: JSONL");
            Arc::new(log)
        }
        None => Arc::new(InMemoryAuditLog::new()),
    })
}

fn task_queue(file: &FileConfig) -> Result<Arc<dyn TaskQueue>> {
    Ok(match &file.tasks.queue_path {
        Some(path) => {
            let queue = FileTaskQueue::open(path)
                .with_context(|| format!("Failed to open task queue {}", path.display()))?;
            Arc::new(queue)
        }
        None => Arc::new(InMemoryTaskQueue::new()),
    })
}

fn notifier(file: &FileConfig) -> Result<Arc<dyn Notifier>> {
    let routing = RoutingNotifier::new().with_fallback(Arc::new(LogNotifier));
    let routing = match &file.escalation.webhook_url {
        Some(url) => with_webhook(routing, url)?,
        None => routing,
    };
    Ok(Arc::new(routing))
}

#[cfg(feature = "webhook")]
fn with_webhook(routing: RoutingNotifier, url: &str) -> Result<RoutingNotifier> {
    let webhook = boardroom_infrastructure::WebhookNotifier::new(url)
        .context("Failed to build webhook client")?;
    Ok(routing.with_route(NotificationChannel::Webhook, Arc::new(webhook)))
}

#[cfg(not(feature = "webhook"))]
fn with_webhook(routing: RoutingNotifier, _url: &str) -> Result<RoutingNotifier> {
    warn!(
        channel = %NotificationChannel::Webhook,
        "escalation.webhook_url is set but this build lacks the `webhook` feature; logging instead"
    );
    Ok(routing)
}
