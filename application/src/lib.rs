//! Application layer for boardroom
//!
//! This crate contains the dispatcher, use cases, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod dispatcher;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::GovernanceConfig;
pub use dispatcher::{
    DispatchError, DispatchOutcome, Dispatcher, HandlerError, HandlerRegistry, MessageHandler,
};
pub use ports::{
    audit_log::{AuditError, AuditLog, NoAuditLog},
    channel_bus::{BusError, ChannelBus, MessageSink, Subscription},
    decision_store::{CasOutcome, DecisionStore, StoreError},
    escalation_store::{EscalationStore, InsertOutcome, RespondOutcome},
    notifier::{Notifier, NotifyError},
    task_queue::TaskQueue,
};
pub use use_cases::escalation::{
    EscalationError, EscalationManager, EscalationOutcome, EscalationRequest,
};
pub use use_cases::governance::{
    DropReason, GovernanceError, GovernanceService, SweepReport, VoteOutcome,
};
pub use use_cases::handlers::register_protocol_handlers;
pub use use_cases::sweeper::DeadlineSweeper;
