//! Audit trail sinks.
//!
//! [`JsonlAuditLog`] appends one JSON object per line to a file;
//! [`InMemoryAuditLog`] keeps events in memory for the HTTP API and tests.

mod jsonl_audit;
mod memory;

pub use jsonl_audit::JsonlAuditLog;
pub use memory::InMemoryAuditLog;
