/*!
 通过单次HTTP请求写入一条聊天消息
*/

use actix_web::{post, web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use super::HubError;
use crate::{
    chat::{default_session_id, generate_id, utc_now_timestamp, ChatMessage, ChatMessageType},
    config::datatype::{MessageID, Timestamp, UserID},
    server::server_state::HubState,
};

/** `SendMessageRequest` 写入消息时所用的数据类型
*/
#[derive(Serialize, Deserialize, Debug)]
pub struct SendMessageRequest {
    pub user_id: UserID,
    pub username: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl SendMessageRequest {
    /// 转换为默认会话中的文本消息，时间戳缺省或为空时取当前时间
    pub fn into_chat_message(self) -> ChatMessage {
        let timestamp = match self.timestamp {
            Some(timestamp) if !timestamp.is_empty() => timestamp,
            _ => utc_now_timestamp(),
        };

        return ChatMessage {
            message_id: generate_id(),
            session_id: default_session_id(),
            user_id: self.user_id,
            username: self.username,
            message: self.message,
            message_type: ChatMessageType::Text,
            timestamp,
            attachments: vec![],
        };
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SendMessageResponse {
    pub message_id: MessageID,
    pub status: String,
    pub timestamp: Timestamp,
}

/** `send_message` 写入消息与对应的通知，不广播给聊天连接
*/
#[post("/SendMessage")]
pub async fn send_message(
    json: web::Json<SendMessageRequest>,
    hub: web::Data<HubState>,
) -> Result<HttpResponse, HubError> {
    let stored = hub
        .store
        .append_message(json.into_inner().into_chat_message())
        .await?;

    info!("用户 {} 写入消息 {}", stored.user_id, stored.message_id);

    return Ok(HttpResponse::Ok().json(SendMessageResponse {
        message_id: stored.message_id,
        status: "OK".to_string(),
        timestamp: stored.timestamp,
    }));
}
