use std::{io, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::chat::{ChatMessage, Notification};

/** `LogDocument` 持久化的整份日志：消息与通知两个按插入顺序排列的序列
*/
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LogDocument {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

/** `LogSnapshot` read_all 返回的完整快照
*/
pub type LogSnapshot = LogDocument;

impl LogDocument {
    /** `append_message` 写入一条消息及其派生通知，二者总是一起出现
     */
    pub fn append_message(&mut self, mut msg: ChatMessage) -> ChatMessage {
        msg.ensure_message_id();
        let notification = Notification::derive_from(&msg);
        self.messages.push(msg.clone());
        self.notifications.push(notification);
        return msg;
    }

    pub fn append_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

/** `StoreError` 日志存储无法读取、解析或写入，当前操作失败且不自动重试
*/
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("log store {} is unreadable: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("log store {} is corrupted: {source}", .path.display())]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("log store {} is unwritable: {source}", .path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/** `ChangeSignal` 每次追加成功后发布当前通知数量，通知流据此被唤醒
*/
pub struct ChangeSignal {
    sender: watch::Sender<usize>,
}

impl ChangeSignal {
    pub fn new(notification_count: usize) -> Self {
        let (sender, _) = watch::channel(notification_count);
        return ChangeSignal { sender };
    }

    pub fn publish(&self, notification_count: usize) {
        self.sender.send_replace(notification_count);
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        return self.sender.subscribe();
    }
}
