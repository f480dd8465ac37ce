//! Domain layer for boardroom
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Messages
//!
//! Agents talk through [`AgentMessage`] envelopes published on named
//! [`Channel`]s. The envelope carries an open `type` tag; the orchestrator
//! decodes the tags it knows ([`MessageKind`]) into typed [`MessageBody`]
//! variants.
//!
//! ## Governance
//!
//! A [`Decision`] is finalized by the HEAD tier (CEO + DAO). Disagreement
//! opens bounded C-level advisory rounds; running out of rounds or time
//! hands the decision to a human via an [`Escalation`]. The state machine
//! itself is the pure [`governance::evaluate`] function.

pub mod agent;
pub mod audit;
pub mod config;
pub mod core;
pub mod governance;
pub mod message;
pub mod task;

// Re-export commonly used types
pub use agent::{AgentRole, Tier};
pub use audit::AuditEvent;
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{
    error::DomainError,
    ids::{AgentId, DecisionId, EscalationId, MessageId, TaskId},
};
pub use governance::{
    Decision, DecisionStatus, DecisionTier, Escalation, EscalationStatus, HumanVerdict,
    NotificationChannel, Resolution, Transition, VoteValue,
};
pub use message::{
    AgentMessage, AlertPayload, Channel, MessageBody, MessageKind, Priority, ProposalPayload,
    Recipient, ResolutionPayload, StatusResponsePayload, TaskPayload, VoteAction, VotePayload,
    VoteRequestPayload,
};
pub use task::QueuedTask;
