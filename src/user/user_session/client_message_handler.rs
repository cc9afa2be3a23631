/*!
客户端与服务端之间通信的直接处理函数
*/

use std::sync::Arc;

use actix::{dev::ToEnvelope, fut, Actor, ActorContext, ActorFutureExt, AsyncContext, WrapFuture};
use log::{debug, error};

use super::{
    actor_message_handler::ActorMessageHandler,
    protocol::{ClientToServerMessage, ErrorFrame, ServerMessageSender, ServerToClientMessage},
    ChatSession, ChatSessionState, SessionActorMessage,
};
use crate::chat::ChatMessage;

pub trait ClientMessageHandler
where
    Self: Actor + ChatSession + ActorMessageHandler,
    Self::Context: ServerMessageSender<Self>
        + ToEnvelope<Self, SessionActorMessage>
        + AsyncContext<Self>
        + ActorContext,
{
    fn handle_client_message(&mut self, msg: ClientToServerMessage, ctx: &mut Self::Context) {
        match msg {
            ClientToServerMessage::Text(text) => self.handle_text_frame(&text, ctx),
            ClientToServerMessage::Ping(bytes) => {
                ctx.send_server_message(&ServerToClientMessage::Pong(bytes))
            }
            ClientToServerMessage::Pong | ClientToServerMessage::Nop => {}
            ClientToServerMessage::Close(reason) => {
                debug!("{} 主动关闭连接", self.get_data().get_info());
                ctx.send_server_message(&ServerToClientMessage::Close(reason));
                ctx.stop();
            }
            ClientToServerMessage::Unsupported => {
                debug!("{} 发送了不支持的帧", self.get_data().get_info());
                ctx.send_server_message(&ServerToClientMessage::Error(
                    ErrorFrame::unsupported_frame(),
                ));
            }
        }
    }

    /** `handle_text_frame` 校验一条聊天消息，非法时只回复发送方
     */
    fn handle_text_frame(&mut self, text: &str, ctx: &mut Self::Context) {
        self.set_state(ChatSessionState::Validating);

        let msg = match ChatMessage::from_client_frame(text) {
            Ok(msg) => msg,
            Err(err) => {
                debug!("{} 的消息无法接受：{}", self.get_data().get_info(), err);
                ctx.send_server_message(&ServerToClientMessage::Error(ErrorFrame::from(&err)));
                self.set_state(ChatSessionState::Reading);
                return;
            }
        };

        self.persist_and_broadcast(msg, ctx);
    }

    /** `persist_and_broadcast` 写入日志后广播给所有连接（包括发送方）。
     * 写入完成前不处理该连接的下一帧
     */
    fn persist_and_broadcast(&mut self, msg: ChatMessage, ctx: &mut Self::Context) {
        self.set_state(ChatSessionState::Persisting);

        let hub = self.get_hub();
        let fut = async move { hub.store.append_message(msg).await };

        ctx.wait(fut.into_actor(self).then(|res, self_actor, ctx| {
            match res {
                Ok(stored) => self_actor.broadcast_message(&stored),
                Err(err) => {
                    error!("{} 写入消息失败：{}", self_actor.get_data().get_info(), err);
                    ctx.send_server_message(&ServerToClientMessage::Error(ErrorFrame::internal()));
                }
            }
            self_actor.set_state(ChatSessionState::Reading);
            fut::ready(())
        }));
    }

    fn broadcast_message(&mut self, stored: &ChatMessage) {
        self.set_state(ChatSessionState::Broadcasting);

        match serde_json::to_string(stored) {
            Ok(json) => {
                debug!(
                    "{} 广播消息 {}",
                    self.get_data().get_info(),
                    stored.message_id
                );
                self.get_hub().registry.broadcast(Arc::new(json));
            }
            Err(err) => error!("消息 {} 序列化失败：{}", stored.message_id, err),
        }
    }
}
