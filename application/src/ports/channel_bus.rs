//! Channel bus port
//!
//! Named pub/sub topics agents and the orchestrator talk over. Delivery is
//! at-most-once and non-durable: a subscriber that is not attached when a
//! message is published never sees it. Within one channel, a subscriber
//! observes messages in publish order; there is no ordering across channels.

use async_trait::async_trait;
use boardroom_domain::{AgentMessage, Channel};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur while publishing
#[derive(Error, Debug)]
pub enum BusError {
    #[error("Channel bus is closed")]
    Closed,

    #[error("Failed to encode message for {channel}: {reason}")]
    Encode { channel: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Receiver side of a subscription.
///
/// Invoked once per message, sequentially, in publish order for the channel.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn deliver(&self, message: AgentMessage);
}

/// Handle to an active subscription.
///
/// Cancelling stops delivery; messages already being delivered finish.
#[derive(Debug, Clone)]
pub struct Subscription {
    channel: Channel,
    token: CancellationToken,
}

impl Subscription {
    pub fn new(channel: Channel, token: CancellationToken) -> Self {
        Self { channel, token }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Pub/sub transport for agent messages.
#[async_trait]
pub trait ChannelBus: Send + Sync {
    /// Publish to every subscriber attached at this moment.
    ///
    /// Returns the number of subscribers reached (zero is not an error).
    async fn publish(&self, channel: &Channel, message: &AgentMessage) -> Result<usize, BusError>;

    /// Attach `sink` to `channel`.
    ///
    /// The subscription is live when this returns: any message published
    /// afterwards is delivered. `parent` cancels it together with its siblings.
    fn subscribe(
        &self,
        channel: &Channel,
        sink: Arc<dyn MessageSink>,
        parent: &CancellationToken,
    ) -> Subscription;
}
