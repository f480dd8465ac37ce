//! Configuration value objects for the domain layer
//!
//! These are shared by the config loader (which produces issues) and the
//! binary (which reports them).

mod validation;

pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
