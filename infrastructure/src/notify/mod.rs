//! Escalation notifiers.
//!
//! [`LogNotifier`] writes escalations to the tracing output and accepts every
//! channel. [`RoutingNotifier`] sends each channel to its own notifier and
//! falls back to a default. With the `webhook` feature, [`WebhookNotifier`]
//! POSTs escalations as JSON.

mod log;
mod routing;
#[cfg(feature = "webhook")]
mod webhook;

pub use log::LogNotifier;
pub use routing::RoutingNotifier;
#[cfg(feature = "webhook")]
pub use webhook::WebhookNotifier;
