//! Append-only JSONL audit file.
//!
//! Each [`AuditEvent`] becomes one line. The file is opened in append mode so
//! the trail survives restarts, and every line is flushed as it is written.

use async_trait::async_trait;
use boardroom_application::ports::audit_log::{AuditError, AuditLog};
use boardroom_domain::AuditEvent;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlAuditLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditLog {
    /// Open (or create) the audit file at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditLog for JsonlAuditLog {
    async fn append(&self, event: AuditEvent) -> Result<(), AuditError> {
        let line = serde_json::to_string(&event)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| AuditError::Unavailable(format!("{} writer poisoned", self.path.display())))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlAuditLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardroom_domain::AgentId;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn test_writes_one_event_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let log = JsonlAuditLog::open(&path).unwrap();

        log.append(AuditEvent::new("vote", AgentId::new("ceo"), json!({"vote": "approve"}), Utc::now()))
            .await
            .unwrap();
        log.append(AuditEvent::new("alert", AgentId::new("cto"), json!({"title": "down"}), Utc::now()))
            .await
            .unwrap();
        drop(log);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["eventType"], "vote");
        assert_eq!(first["sourceAgent"], "ceo");
        assert_eq!(first["payload"]["vote"], "approve");
        assert!(first.get("timestamp").is_some());
    }

    #[tokio::test]
    async fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");

        for source in ["ceo", "dao"] {
            let log = JsonlAuditLog::open(&path).unwrap();
            log.append(AuditEvent::new("vote", AgentId::new(source), json!({}), Utc::now()))
                .await
                .unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_open_fails_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            JsonlAuditLog::open(dir.path()),
            Err(AuditError::Io(_))
        ));
    }
}
