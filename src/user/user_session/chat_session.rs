use std::{net::SocketAddr, sync::Arc};

use actix::{dev::ToEnvelope, prelude::SendError, Actor, Handler, Message, Recipient};
use actix_web::web;

use crate::{
    config::datatype::ConnectionID,
    server::{
        connection_registry::{ChatConnection, DeliveryFailure},
        server_state::HubState,
    },
};

/** `ChatSessionState` 聊天连接的状态
*/
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ChatSessionState {
    Open,
    Reading,
    Validating,
    Persisting,
    Broadcasting,
    Closed,
}

/** `ChatSessionData` 聊天连接数据类型
*/
pub struct ChatSessionData {
    pub state: ChatSessionState,
    pub client_ip: SocketAddr,
    pub connection_id: Option<ConnectionID>,
}

impl ChatSessionData {
    pub fn new(client_ip: SocketAddr) -> Self {
        return ChatSessionData {
            state: ChatSessionState::Open,
            client_ip,
            connection_id: None,
        };
    }

    pub fn get_info(&self) -> String {
        return format!(
            "ChatSession (ip : {}, id : {})",
            self.client_ip,
            self.connection_id.map_or(0, |id| id)
        );
    }
}

/** `ChatSession` 定义一个聊天连接应该具有的特征
*/
pub trait ChatSession
where
    Self: Actor + Handler<SessionActorMessage>,
    Self::Context: ToEnvelope<Self, SessionActorMessage>,
{
    fn get_data(&self) -> &ChatSessionData;

    fn get_mut_data(&mut self) -> &mut ChatSessionData;

    fn get_hub(&self) -> web::Data<HubState>;

    fn set_state(&mut self, state: ChatSessionState) {
        let data = self.get_mut_data();
        // 关闭后的连接不再改变状态
        if data.state != ChatSessionState::Closed {
            data.state = state;
        }
    }
}

/** `SessionActorMessage` 聊天连接从服务端其他Actor收到的消息
*/
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub enum SessionActorMessage {
    Deliver(Arc<String>),
}

impl ChatConnection for Recipient<SessionActorMessage> {
    fn deliver(&self, payload: Arc<String>) -> Result<(), DeliveryFailure> {
        return match self.try_send(SessionActorMessage::Deliver(payload)) {
            Ok(()) => Ok(()),
            // 邮箱已满不算失败，不计容量继续排队
            Err(SendError::Full(msg)) => {
                self.do_send(msg);
                Ok(())
            }
            Err(SendError::Closed(_)) => Err(DeliveryFailure),
        };
    }
}
