//! Use cases (application services)

pub mod escalation;
pub mod governance;
pub mod handlers;
pub mod sweeper;
