use serde::{Deserialize, Serialize};

use super::{chat::generate_id, ChatMessage};
use crate::config::datatype::{NotificationID, Timestamp, UserID};

/// 由聊天消息派生的通知类型
pub const MESSAGE_NOTIFICATION_TYPE: &str = "message";

/// 通知正文最多保留的字符数
pub const NOTIFICATION_CONTENT_MAX_CHARS: usize = 200;

/** `NotificationPriority` 通知优先级
*/
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    #[default]
    Normal,
    High,
}

/** `Notification` 通知数据类型，创建后不再修改
*/
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Notification {
    pub notification_id: NotificationID,
    pub user_id: UserID,
    pub r#type: String,
    pub title: String,
    pub content: String,
    pub timestamp: Timestamp,
    pub priority: NotificationPriority,
}

impl Notification {
    /** `derive_from` 为一条已写入的聊天消息生成对应的通知，
     * 除notification_id外结果只取决于输入
     */
    pub fn derive_from(msg: &ChatMessage) -> Notification {
        return Notification {
            notification_id: generate_id(),
            user_id: msg.user_id.clone(),
            r#type: MESSAGE_NOTIFICATION_TYPE.to_string(),
            title: format!("New message from {}", msg.username),
            content: msg
                .message
                .chars()
                .take(NOTIFICATION_CONTENT_MAX_CHARS)
                .collect(),
            timestamp: msg.timestamp.clone(),
            priority: NotificationPriority::Normal,
        };
    }
}
