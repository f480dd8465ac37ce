//! Task queue port
//!
//! Durable FIFO work queues, one per agent. Distinct from the channel bus:
//! a task pushed while its agent is offline is still there when it polls.

use super::decision_store::StoreError;
use async_trait::async_trait;
use boardroom_domain::{AgentId, QueuedTask};

#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Append a task to the back of its agent's queue.
    async fn push(&self, task: QueuedTask) -> Result<(), StoreError>;

    /// Take the oldest task for `agent`.
    async fn pop(&self, agent: &AgentId) -> Result<Option<QueuedTask>, StoreError>;

    async fn len(&self, agent: &AgentId) -> Result<usize, StoreError>;
}
