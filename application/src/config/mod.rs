//! Application-level configuration.
//!
//! - [`GovernanceConfig`]: round budget, round deadlines, sweep interval and
//!   default escalation channels

pub mod governance_config;

pub use governance_config::GovernanceConfig;
