/*!
actor的消息处理函数
*/

use actix::{dev::ToEnvelope, Actor, Handler};

use super::{
    protocol::{ServerMessageSender, ServerToClientMessage},
    ChatSession, SessionActorMessage,
};

pub trait ActorMessageHandler
where
    Self: Actor + ChatSession + Handler<SessionActorMessage>,
    Self::Context: ServerMessageSender<Self> + ToEnvelope<Self, SessionActorMessage>,
{
    fn handle_actor_message(&mut self, msg: SessionActorMessage, ctx: &mut Self::Context) {
        match msg {
            SessionActorMessage::Deliver(payload) => {
                ctx.send_server_message(&ServerToClientMessage::Message(payload));
            }
        }
    }
}
