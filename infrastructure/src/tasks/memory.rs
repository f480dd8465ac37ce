use async_trait::async_trait;
use boardroom_application::ports::decision_store::StoreError;
use boardroom_application::ports::task_queue::TaskQueue;
use boardroom_domain::{AgentId, QueuedTask};
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

/// Volatile task queue; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryTaskQueue {
    queues: Mutex<HashMap<AgentId, VecDeque<QueuedTask>>>,
}

impl InMemoryTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn push(&self, task: QueuedTask) -> Result<(), StoreError> {
        self.queues
            .lock()
            .await
            .entry(task.agent.clone())
            .or_default()
            .push_back(task);
        Ok(())
    }

    async fn pop(&self, agent: &AgentId) -> Result<Option<QueuedTask>, StoreError> {
        Ok(self
            .queues
            .lock()
            .await
            .get_mut(agent)
            .and_then(VecDeque::pop_front))
    }

    async fn len(&self, agent: &AgentId) -> Result<usize, StoreError> {
        Ok(self.queues.lock().await.get(agent).map_or(0, VecDeque::len))
    }
}
