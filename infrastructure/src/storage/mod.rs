//! Storage adapters for the decision and escalation stores.

mod memory;

pub use memory::{InMemoryDecisionStore, InMemoryEscalationStore};
