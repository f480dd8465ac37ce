//! Handler registry: message kind → handler.

use crate::ports::channel_bus::BusError;
use crate::ports::decision_store::StoreError;
use crate::use_cases::escalation::EscalationError;
use crate::use_cases::governance::GovernanceError;
use async_trait::async_trait;
use boardroom_domain::{AgentMessage, DomainError, MessageBody, MessageKind};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

/// Failure reported by a handler.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error(transparent)]
    Escalation(#[from] EscalationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Handler received a {0} body it does not handle")]
    UnexpectedBody(MessageKind),
}

/// Processes one decoded message.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: &AgentMessage, body: MessageBody) -> Result<(), HandlerError>;
}

/// Maps each [`MessageKind`] to at most one handler.
///
/// Owned by a single [`Dispatcher`](super::Dispatcher); there is no global
/// registry.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<MessageKind, Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: MessageKind, handler: Arc<dyn MessageHandler>) {
        if self.handlers.insert(kind, handler).is_some() {
            trace!(kind = %kind, "Replaced message handler");
        } else {
            trace!(kind = %kind, "Registered message handler");
        }
    }

    pub fn get(&self, kind: MessageKind) -> Option<Arc<dyn MessageHandler>> {
        self.handlers.get(&kind).cloned()
    }

    pub fn contains(&self, kind: MessageKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Registered kinds in declaration order.
    pub fn kinds(&self) -> Vec<MessageKind> {
        let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Tagged(usize, Arc<AtomicUsize>);

    #[async_trait]
    impl MessageHandler for Tagged {
        async fn handle(&self, _: &AgentMessage, _: MessageBody) -> Result<(), HandlerError> {
            self.1.store(self.0, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_reregistration_overwrites() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut registry = HandlerRegistry::new();
        registry.register(MessageKind::Vote, Arc::new(Tagged(1, seen.clone())));
        registry.register(MessageKind::Vote, Arc::new(Tagged(2, seen.clone())));
        assert_eq!(registry.len(), 1);

        let handler = registry.get(MessageKind::Vote).unwrap();
        let message = AgentMessage::raw("vote", "ceo", "orchestrator", serde_json::json!({}));
        handler
            .handle(&message, MessageBody::StatusRequest)
            .await
            .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unregistered_kind_lookup_is_none() {
        let registry = HandlerRegistry::new();
        assert!(registry.get(MessageKind::Alert).is_none());
        assert!(registry.is_empty());
    }
}
