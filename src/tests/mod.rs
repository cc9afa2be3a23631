mod chat_message_test;
mod config_test;
mod load_stats_test;
mod upload_test;

use crate::chat::{ChatMessage, ChatMessageType};

pub fn sample_message(user_id: &str, username: &str, message: &str) -> ChatMessage {
    return ChatMessage {
        message_id: String::new(),
        session_id: "session".to_string(),
        user_id: user_id.to_string(),
        username: username.to_string(),
        message: message.to_string(),
        message_type: ChatMessageType::Text,
        timestamp: "2024-01-01T00:00:00Z".to_string(),
        attachments: vec![],
    };
}
