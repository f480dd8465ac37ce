//! Infrastructure layer for boardroom
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the in-process channel bus, stores, audit sinks,
//! task queues, notifiers, and configuration file loading.

pub mod bus;
pub mod config;
pub mod logging;
pub mod notify;
pub mod storage;
pub mod tasks;

// Re-export commonly used types
pub use bus::{DEFAULT_CHANNEL_CAPACITY, InMemoryChannelBus};
pub use config::{ConfigLoader, FileConfig};
pub use logging::{InMemoryAuditLog, JsonlAuditLog};
#[cfg(feature = "webhook")]
pub use notify::WebhookNotifier;
pub use notify::{LogNotifier, RoutingNotifier};
pub use storage::{InMemoryDecisionStore, InMemoryEscalationStore};
pub use tasks::{FileTaskQueue, InMemoryTaskQueue};
