/*! 前后端交互协议 */

use std::sync::Arc;

use actix::Actor;
use actix_web_actors::ws::{self, CloseReason, WebsocketContext};
use bytes::Bytes;
use log::error;
use serde::{Deserialize, Serialize};

use crate::chat::FrameError;

/** `ClientToServerMessage` 客户端通过WebSocket发来的帧
 */
#[derive(Clone, Debug, PartialEq)]
pub enum ClientToServerMessage {
    Text(String),
    Ping(Bytes),
    Pong,
    Close(Option<CloseReason>),
    Nop,
    /// 二进制帧与分片帧
    Unsupported,
}

impl From<ws::Message> for ClientToServerMessage {
    fn from(ws_msg: ws::Message) -> Self {
        match ws_msg {
            ws::Message::Text(text) => ClientToServerMessage::Text(text.to_string()),
            ws::Message::Ping(bytes) => ClientToServerMessage::Ping(bytes),
            ws::Message::Pong(_) => ClientToServerMessage::Pong,
            ws::Message::Close(reason) => ClientToServerMessage::Close(reason),
            ws::Message::Nop => ClientToServerMessage::Nop,
            ws::Message::Binary(_) | ws::Message::Continuation(_) => {
                ClientToServerMessage::Unsupported
            }
        }
    }
}

/** `ErrorFrame` 只回复给出错连接的错误帧
 */
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorFrame {
    pub error: String,
}

impl ErrorFrame {
    pub fn internal() -> Self {
        return ErrorFrame {
            error: "internal error".to_string(),
        };
    }

    pub fn unsupported_frame() -> Self {
        return ErrorFrame {
            error: "unsupported frame".to_string(),
        };
    }
}

impl From<&FrameError> for ErrorFrame {
    fn from(err: &FrameError) -> Self {
        return ErrorFrame {
            error: err.to_string(),
        };
    }
}

/** `ServerToClientMessage` 服务端发给客户端的帧
 */
#[derive(Clone, Debug)]
pub enum ServerToClientMessage {
    Pong(Bytes),
    Close(Option<CloseReason>),
    /// 已序列化的广播消息，所有连接共享同一份
    Message(Arc<String>),
    Error(ErrorFrame),
}

pub trait ServerMessageSender<A>
where
    A: Actor<Context = Self>,
{
    fn send_server_message(&mut self, msg: &ServerToClientMessage);
}

impl<A> ServerMessageSender<A> for WebsocketContext<A>
where
    A: Actor<Context = WebsocketContext<A>>,
{
    fn send_server_message(&mut self, msg: &ServerToClientMessage) {
        match msg {
            ServerToClientMessage::Pong(bytes) => self.pong(bytes),
            ServerToClientMessage::Close(reason) => self.close(reason.clone()),
            ServerToClientMessage::Message(json) => self.text(json.as_str()),
            ServerToClientMessage::Error(frame) => match serde_json::to_string(frame) {
                Ok(json) => self.text(json),
                Err(err) => error!("错误帧序列化失败：{}", err),
            },
        }
    }
}
