use async_trait::async_trait;
use boardroom_application::ports::notifier::{NotifyError, Notifier};
use boardroom_domain::{Escalation, NotificationChannel};
use std::collections::HashMap;
use std::sync::Arc;

/// Dispatches each channel to a dedicated notifier, or to the fallback.
pub struct RoutingNotifier {
    routes: HashMap<NotificationChannel, Arc<dyn Notifier>>,
    fallback: Option<Arc<dyn Notifier>>,
}

impl RoutingNotifier {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            fallback: None,
        }
    }

    pub fn with_route(mut self, channel: NotificationChannel, notifier: Arc<dyn Notifier>) -> Self {
        self.routes.insert(channel, notifier);
        self
    }

    /// Notifier for channels without a dedicated route.
    pub fn with_fallback(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.fallback = Some(notifier);
        self
    }

    pub fn has_route(&self, channel: NotificationChannel) -> bool {
        self.routes.contains_key(&channel)
    }
}

impl Default for RoutingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for RoutingNotifier {
    async fn notify(
        &self,
        channel: NotificationChannel,
        escalation: &Escalation,
    ) -> Result<(), NotifyError> {
        match self.routes.get(&channel).or(self.fallback.as_ref()) {
            Some(notifier) => notifier.notify(channel, escalation).await,
            None => Err(NotifyError::Unsupported(channel)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<NotificationChannel>>);

    #[async_trait]
    impl Notifier for Recording {
        async fn notify(
            &self,
            channel: NotificationChannel,
            _escalation: &Escalation,
        ) -> Result<(), NotifyError> {
            self.0.lock().unwrap().push(channel);
            Ok(())
        }
    }

    fn escalation() -> Escalation {
        Escalation::open("Database down", None, vec![], Utc::now())
    }

    #[tokio::test]
    async fn test_routes_then_falls_back() {
        let webhook = Arc::new(Recording::default());
        let fallback = Arc::new(Recording::default());
        let notifier = RoutingNotifier::new()
            .with_route(NotificationChannel::Webhook, webhook.clone())
            .with_fallback(fallback.clone());

        notifier
            .notify(NotificationChannel::Webhook, &escalation())
            .await
            .unwrap();
        notifier
            .notify(NotificationChannel::Telegram, &escalation())
            .await
            .unwrap();

        assert_eq!(*webhook.0.lock().unwrap(), vec![NotificationChannel::Webhook]);
        assert_eq!(*fallback.0.lock().unwrap(), vec![NotificationChannel::Telegram]);
    }

    #[tokio::test]
    async fn test_unrouted_channel_without_fallback_is_unsupported() {
        let notifier = RoutingNotifier::new();
        let err = notifier
            .notify(NotificationChannel::Email, &escalation())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Unsupported(NotificationChannel::Email)));
    }
}
