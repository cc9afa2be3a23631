use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::chat::{generate_id, utc_now_timestamp};
use crate::config::datatype::{MessageID, SessionID, Timestamp, UserID};

/** `ChatMessageType` 聊天消息类型，不在枚举内的值在写入前即被拒绝
*/
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatMessageType {
    #[default]
    Text,
    Image,
    File,
    System,
    Ping,
    Pong,
}

impl ChatMessageType {
    pub fn get_str(&self) -> &'static str {
        match *self {
            ChatMessageType::Text => "text",
            ChatMessageType::Image => "image",
            ChatMessageType::File => "file",
            ChatMessageType::System => "system",
            ChatMessageType::Ping => "ping",
            ChatMessageType::Pong => "pong",
        }
    }
}

/** `ChatMessage` 聊天消息数据类型
*/
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    #[serde(default)]
    pub message_id: MessageID,
    pub session_id: SessionID,
    pub user_id: UserID,
    pub username: String,
    pub message: String,
    pub message_type: ChatMessageType,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/** `FrameError` 客户端帧无法被接受的原因，只回复给发送方，连接保持打开
*/
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid json")]
    InvalidJson,
    #[error("invalid ChatMessage: {0}")]
    InvalidChatMessage(String),
}

impl ChatMessage {
    /** `from_client_frame` 解析一条客户端文本帧：
     * 先解析JSON，再补全缺省字段，最后按ChatMessage校验
     */
    pub fn from_client_frame(text: &str) -> Result<ChatMessage, FrameError> {
        let mut value: Value = serde_json::from_str(text).map_err(|_| FrameError::InvalidJson)?;

        match value.as_object_mut() {
            Some(object) => apply_client_defaults(object),
            None => {
                return Err(FrameError::InvalidChatMessage(
                    "expected a JSON object".to_string(),
                ))
            }
        }

        return serde_json::from_value::<ChatMessage>(value)
            .map_err(|err| FrameError::InvalidChatMessage(err.to_string()));
    }

    /// 持久化前补全服务端生成的ID
    pub fn ensure_message_id(&mut self) {
        if self.message_id.is_empty() {
            self.message_id = generate_id();
        }
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    return matches!(value, None | Some(Value::Null));
}

fn is_absent_or_empty(value: Option<&Value>) -> bool {
    return match value {
        None | Some(Value::Null) => true,
        Some(Value::String(str)) => str.is_empty(),
        Some(_) => false,
    };
}

/** `apply_client_defaults` 校验前的缺省值替换
*/
pub fn apply_client_defaults(object: &mut Map<String, Value>) {
    if is_absent(object.get("message_type")) {
        object.insert(
            "message_type".to_string(),
            Value::from(ChatMessageType::Text.get_str()),
        );
    }

    if is_absent_or_empty(object.get("timestamp")) {
        object.insert("timestamp".to_string(), Value::from(utc_now_timestamp()));
    }

    if is_absent_or_empty(object.get("message_id")) {
        object.insert("message_id".to_string(), Value::from(generate_id()));
    }

    if is_absent(object.get("attachments")) {
        object.insert("attachments".to_string(), Value::Array(vec![]));
    }
}
