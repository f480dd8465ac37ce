//! Follow-up work handed to agents through their task queues.

use crate::core::ids::{AgentId, MessageId, TaskId};
use crate::message::TaskPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A task waiting in an agent's queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedTask {
    pub id: TaskId,
    pub agent: AgentId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data: Value,
    pub assigned_by: AgentId,
    /// Message that carried the task, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_message: Option<MessageId>,
    pub enqueued_at: DateTime<Utc>,
}

impl QueuedTask {
    pub fn new(
        agent: AgentId,
        title: impl Into<String>,
        assigned_by: AgentId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TaskId::generate(),
            agent,
            title: title.into(),
            description: String::new(),
            data: Value::Null,
            assigned_by,
            source_message: None,
            enqueued_at: now,
        }
    }

    /// Build a queued task from a `task` message body.
    ///
    /// A task id supplied by the sender is kept; otherwise one is generated.
    pub fn from_payload(
        payload: TaskPayload,
        agent: AgentId,
        assigned_by: AgentId,
        source_message: Option<MessageId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: payload.task_id.unwrap_or_else(TaskId::generate),
            agent,
            title: payload.title,
            description: payload.description,
            data: payload.data,
            assigned_by,
            source_message,
            enqueued_at: now,
        }
    }
}
