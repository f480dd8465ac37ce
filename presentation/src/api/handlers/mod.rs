//! API request handlers

mod decisions;
mod escalations;
mod health;
mod messages;

pub use decisions::*;
pub use escalations::*;
pub use health::*;
pub use messages::*;
