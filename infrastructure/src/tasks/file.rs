//! File-backed task queue.
//!
//! The whole queue map is rewritten as pretty JSON after every mutation,
//! via a sibling temp file and a rename so a crash never leaves a torn file.

use async_trait::async_trait;
use boardroom_application::ports::decision_store::StoreError;
use boardroom_application::ports::task_queue::TaskQueue;
use boardroom_domain::{AgentId, QueuedTask};
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

type Queues = BTreeMap<AgentId, VecDeque<QueuedTask>>;

pub struct FileTaskQueue {
    path: PathBuf,
    queues: Mutex<Queues>,
}

impl FileTaskQueue {
    /// Open the queue stored at `path`, starting empty if the file is absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let queues = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Queues::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Queues::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(
            path = %path.display(),
            agents = queues.len(),
            "Task queue loaded"
        );
        Ok(Self {
            path,
            queues: Mutex::new(queues),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, queues: &Queues) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(queues)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskQueue for FileTaskQueue {
    async fn push(&self, task: QueuedTask) -> Result<(), StoreError> {
        let mut queues = self.queues.lock().await;
        let mut next = queues.clone();
        next.entry(task.agent.clone()).or_default().push_back(task);
        self.persist(&next).await?;
        *queues = next;
        Ok(())
    }

    async fn pop(&self, agent: &AgentId) -> Result<Option<QueuedTask>, StoreError> {
        let mut queues = self.queues.lock().await;
        if !queues.contains_key(agent) {
            return Ok(None);
        }
        // Memory only changes once the new state is on disk.
        let mut next = queues.clone();
        let Some(queue) = next.get_mut(agent) else {
            return Ok(None);
        };
        let task = queue.pop_front();
        if queue.is_empty() {
            next.remove(agent);
        }
        if task.is_some() {
            self.persist(&next).await?;
        }
        *queues = next;
        Ok(task)
    }

    async fn len(&self, agent: &AgentId) -> Result<usize, StoreError> {
        Ok(self.queues.lock().await.get(agent).map_or(0, VecDeque::len))
    }
}
