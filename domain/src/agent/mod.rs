//! Agent roster: executive roles and their governance tier.

pub mod role;

pub use role::{AgentRole, Tier};
