use async_trait::async_trait;
use boardroom_application::ports::notifier::{NotifyError, Notifier};
use boardroom_domain::{Escalation, NotificationChannel};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs `{ channel, escalation }` as JSON to a fixed URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .user_agent(concat!("boardroom/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(
        &self,
        channel: NotificationChannel,
        escalation: &Escalation,
    ) -> Result<(), NotifyError> {
        let body = json!({
            "channel": channel,
            "escalation": escalation,
        });
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery {
                channel,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Delivery {
                channel,
                reason: format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }
        debug!(escalation_id = %escalation.id, url = %self.url, "Webhook delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_delivery_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook").unwrap();
        let escalation = Escalation::open("Deadlock", None, vec![], Utc::now());
        let err = notifier
            .notify(NotificationChannel::Webhook, &escalation)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NotifyError::Delivery {
                channel: NotificationChannel::Webhook,
                ..
            }
        ));
    }
}
