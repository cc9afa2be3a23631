use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::chat::{ChatMessage, Notification};
use crate::database::{ChangeSignal, LogDocument, LogSnapshot, LogStore, StoreError};

/** `MemoryStore` 仅保存在进程内存中的日志，所有修改在同一把锁内完成
*/
pub struct MemoryStore {
    document: Mutex<LogDocument>,
    changes: ChangeSignal,
}

impl MemoryStore {
    pub fn new() -> Self {
        return MemoryStore {
            document: Mutex::new(LogDocument::default()),
            changes: ChangeSignal::new(0),
        };
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn append_message(&self, msg: ChatMessage) -> Result<ChatMessage, StoreError> {
        let mut document = self.document.lock();
        let stored = document.append_message(msg);
        self.changes.publish(document.notifications.len());
        return Ok(stored);
    }

    async fn append_notification(&self, notification: Notification) -> Result<(), StoreError> {
        let mut document = self.document.lock();
        document.append_notification(notification);
        self.changes.publish(document.notifications.len());
        return Ok(());
    }

    async fn read_all(&self) -> Result<LogSnapshot, StoreError> {
        return Ok(self.document.lock().clone());
    }

    async fn read_notifications_from(
        &self,
        offset: usize,
    ) -> Result<Vec<Notification>, StoreError> {
        let document = self.document.lock();
        return Ok(document.notifications.iter().skip(offset).cloned().collect());
    }

    fn subscribe(&self) -> watch::Receiver<usize> {
        return self.changes.subscribe();
    }
}
