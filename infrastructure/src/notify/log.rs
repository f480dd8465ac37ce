use async_trait::async_trait;
use boardroom_application::ports::notifier::{NotifyError, Notifier};
use boardroom_domain::{Escalation, NotificationChannel};
use tracing::warn;

/// Emits each escalation as a structured `warn` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        channel: NotificationChannel,
        escalation: &Escalation,
    ) -> Result<(), NotifyError> {
        warn!(
            channel = channel.as_str(),
            escalation_id = %escalation.id,
            decision_id = escalation.decision_id.as_ref().map(|id| id.as_str()),
            "Escalation: {}",
            escalation.reason
        );
        Ok(())
    }
}
