//! In-process channel bus backed by `tokio::sync::broadcast`.
//!
//! One broadcast sender per channel name, created lazily. Each subscription
//! owns a receiver and a task that feeds the sink sequentially, so a
//! subscriber sees a channel's messages in publish order. A subscriber that
//! falls more than `capacity` messages behind loses the overflow with a
//! warning; the publisher never blocks.

use async_trait::async_trait;
use boardroom_application::ports::channel_bus::{BusError, ChannelBus, MessageSink, Subscription};
use boardroom_domain::{AgentMessage, Channel};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Default per-channel buffer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

pub struct InMemoryChannelBus {
    channels: Mutex<HashMap<String, broadcast::Sender<AgentMessage>>>,
    capacity: usize,
}

impl Default for InMemoryChannelBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl InMemoryChannelBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Number of live receivers on `channel`.
    pub fn subscriber_count(&self, channel: &Channel) -> usize {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&channel.name())
            .map_or(0, |sender| sender.receiver_count())
    }

    fn sender(&self, channel: &Channel) -> broadcast::Sender<AgentMessage> {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels
            .entry(channel.name())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

#[async_trait]
impl ChannelBus for InMemoryChannelBus {
    async fn publish(&self, channel: &Channel, message: &AgentMessage) -> Result<usize, BusError> {
        let sender = {
            let channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
            channels.get(&channel.name()).cloned()
        };
        let reached = match sender {
            // `send` only fails when nobody is listening.
            Some(sender) => sender.send(message.clone()).unwrap_or(0),
            None => 0,
        };
        trace!(
            channel = %channel,
            message_id = %message.id,
            kind = %message.message_type,
            reached,
            "Published"
        );
        Ok(reached)
    }

    fn subscribe(
        &self,
        channel: &Channel,
        sink: Arc<dyn MessageSink>,
        parent: &CancellationToken,
    ) -> Subscription {
        let mut receiver = self.sender(channel).subscribe();
        let token = parent.child_token();
        let subscription = Subscription::new(channel.clone(), token.clone());
        let name = channel.name();
        debug!(channel = %name, "Subscribed");

        tokio::spawn(async move {
            loop {
                let received = tokio::select! {
                    _ = token.cancelled() => break,
                    received = receiver.recv() => received,
                };
                match received {
                    Ok(message) => sink.deliver(message).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(channel = %name, skipped, "Subscriber lagged, messages dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!(channel = %name, "Subscription ended");
        });

        subscription
    }
}
