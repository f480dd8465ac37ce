//! Message dispatch
//!
//! The [`Dispatcher`] is the single entry point for inbound agent messages.
//! For every message it:
//!
//! 1. appends an audit event (always, even for unknown types),
//! 2. looks up the handler for the message kind,
//! 3. decodes the typed body and runs the handler in an isolated task.
//!
//! ```text
//! AgentMessage ──► audit ──► registry lookup ──► decode ──► spawn(handler)
//!                              │ none                │ err        │ err / panic
//!                              ▼                     ▼            ▼
//!                          Unhandled              Failed        Failed
//! ```
//!
//! Nothing that goes wrong for one message stops processing of the next.

pub mod registry;

pub use registry::{HandlerError, HandlerRegistry, MessageHandler};

use crate::ports::audit_log::AuditLog;
use crate::ports::channel_bus::MessageSink;
use async_trait::async_trait;
use boardroom_domain::{AgentMessage, AuditEvent, DomainError, MessageBody, MessageKind};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Why a message could not be processed.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Failed to decode {kind} body: {source}")]
    Decode {
        kind: MessageKind,
        #[source]
        source: DomainError,
    },

    #[error("Handler for {kind} failed: {source}")]
    Handler {
        kind: MessageKind,
        #[source]
        source: HandlerError,
    },

    #[error("Handler for {kind} panicked: {message}")]
    Panicked { kind: MessageKind, message: String },

    #[error("Handler for {kind} was cancelled")]
    Cancelled { kind: MessageKind },
}

/// Result of dispatching one message.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The handler ran to completion.
    Handled(MessageKind),
    /// Unknown type tag or no handler registered; only the audit event was written.
    Unhandled(String),
    /// Decoding or the handler failed; later messages are unaffected.
    Failed(DispatchError),
}

impl DispatchOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, DispatchOutcome::Handled(_))
    }
}

/// Routes inbound messages to their handlers.
pub struct Dispatcher {
    registry: HandlerRegistry,
    audit: Arc<dyn AuditLog>,
}

impl Dispatcher {
    pub fn new(registry: HandlerRegistry, audit: Arc<dyn AuditLog>) -> Self {
        Self { registry, audit }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn register_handler(&mut self, kind: MessageKind, handler: Arc<dyn MessageHandler>) {
        self.registry.register(kind, handler);
    }

    /// Audit and route one message.
    pub async fn process_message(&self, message: AgentMessage) -> DispatchOutcome {
        let event = AuditEvent::from_message(&message, Utc::now());
        if let Err(e) = self.audit.append(event).await {
            warn!(
                message_id = %message.id,
                kind = %message.message_type,
                "Failed to write audit event: {}",
                e
            );
        }

        let Some(kind) = message.kind() else {
            debug!(
                message_id = %message.id,
                kind = %message.message_type,
                from = %message.from,
                "Unknown message type, audited only"
            );
            return DispatchOutcome::Unhandled(message.message_type);
        };

        let Some(handler) = self.registry.get(kind) else {
            debug!(
                message_id = %message.id,
                kind = %kind,
                "No handler registered, audited only"
            );
            return DispatchOutcome::Unhandled(message.message_type);
        };

        let body = match MessageBody::decode(kind, &message.payload) {
            Ok(body) => body,
            Err(source) => {
                warn!(
                    message_id = %message.id,
                    kind = %kind,
                    from = %message.from,
                    payload = %message.payload,
                    "Dropping message with undecodable body: {}",
                    source
                );
                return DispatchOutcome::Failed(DispatchError::Decode { kind, source });
            }
        };

        let message_id = message.id.clone();
        let from = message.from.clone();
        let task = tokio::spawn(async move { handler.handle(&message, body).await });

        let failure = match task.await {
            Ok(Ok(())) => return DispatchOutcome::Handled(kind),
            Ok(Err(source)) => DispatchError::Handler { kind, source },
            Err(join_error) if join_error.is_panic() => DispatchError::Panicked {
                kind,
                message: panic_message(join_error.into_panic()),
            },
            Err(_) => DispatchError::Cancelled { kind },
        };
        error!(
            message_id = %message_id,
            kind = %kind,
            from = %from,
            "{}",
            failure
        );
        DispatchOutcome::Failed(failure)
    }
}

#[async_trait]
impl MessageSink for Dispatcher {
    async fn deliver(&self, message: AgentMessage) {
        self.process_message(message).await;
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
