//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audit_log;
pub mod channel_bus;
pub mod decision_store;
pub mod escalation_store;
pub mod notifier;
pub mod task_queue;
