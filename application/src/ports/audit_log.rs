//! Port for the audit trail.
//!
//! Defines the [`AuditLog`] trait the dispatcher writes one event to for
//! every inbound message, and the governance service writes to for human
//! overrides.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures a machine-readable,
//! append-only record of what agents said to each other.

use async_trait::async_trait;
use boardroom_domain::AuditEvent;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audit event could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Append-only audit sink.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, event: AuditEvent) -> Result<(), AuditError>;
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLog;

#[async_trait]
impl AuditLog for NoAuditLog {
    async fn append(&self, _event: AuditEvent) -> Result<(), AuditError> {
        Ok(())
    }
}
