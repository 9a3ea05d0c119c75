use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info};

/// One outgoing email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl Message {
    /// Stable content id, used to name outbox files.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to.as_bytes());
        hasher.update([0]);
        hasher.update(self.subject.as_bytes());
        hasher.update([0]);
        hasher.update(self.text.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &Message) -> Result<()>;
}

/// Drops each message as a JSON file for a mail relay to pick up.
pub struct OutboxNotifier {
    dir: PathBuf,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboxEntry<'a> {
    id: String,
    queued_at: String,
    #[serde(flatten)]
    message: &'a Message,
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn send(&self, message: &Message) -> Result<()> {
        let now = Utc::now();
        let id = message.digest();
        let entry = OutboxEntry {
            id: id.clone(),
            queued_at: now.to_rfc3339(),
            message,
        };
        let body = serde_json::to_vec_pretty(&entry)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Notify(format!("outbox unavailable: {e}")))?;
        let path = self
            .dir
            .join(format!("{}-{}.json", now.format("%Y%m%dT%H%M%S%.3f"), &id[..16]));
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| AppError::Notify(format!("failed to write {}: {e}", path.display())))?;

        info!("Queued email to {} ({}) at {}", message.to, message.subject, path.display());
        Ok(())
    }
}

/// Keeps sent messages in memory. Sends to `failing_recipient` error out.
#[derive(Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Message>>,
    failing_recipient: Option<String>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(recipient: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_recipient: Some(recipient.into()),
        }
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, message: &Message) -> Result<()> {
        if self.failing_recipient.as_deref() == Some(message.to.as_str()) {
            return Err(AppError::Notify(format!("rejected recipient {}", message.to)));
        }
        debug!("Recorded email to {}", message.to);
        self.sent
            .lock()
            .map_err(|_| AppError::Internal("notifier lock poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }
}
