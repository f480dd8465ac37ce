//! Escalation notifier port
//!
//! Delivery to humans (telegram, email, dashboard, webhook) is best-effort.
//! A failed notification never invalidates the escalation record.

use async_trait::async_trait;
use boardroom_domain::{Escalation, NotificationChannel};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("No sender configured for channel {0}")]
    Unsupported(NotificationChannel),

    #[error("Delivery on {channel} failed: {reason}")]
    Delivery {
        channel: NotificationChannel,
        reason: String,
    },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        channel: NotificationChannel,
        escalation: &Escalation,
    ) -> Result<(), NotifyError>;
}
