use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{get, web, HttpRequest, HttpResponse};
use actix_web_actors::ws::{self, WebsocketContext};
use log::debug;

use super::actor_message_handler::ActorMessageHandler;
use super::client_message_handler::ClientMessageHandler;
use super::{ChatSession, ChatSessionData, ChatSessionState, SessionActorMessage};
use crate::server::server_state::HubState;

/** `WsChatSession` Websocket聊天连接数据类型
*/
pub struct WsChatSession {
    pub data: ChatSessionData,
    pub hub: web::Data<HubState>,
    pub last_receive_time: Instant,
}

impl WsChatSession {
    pub fn new(data: ChatSessionData, hub: web::Data<HubState>) -> Self {
        return WsChatSession {
            data,
            hub,
            last_receive_time: Instant::now(),
        };
    }

    /** `start_heart_beat` 每个周期向客户端发送 Ping，
     * 连续两个周期收不到任何帧（包括 Pong）才断开
     */
    fn start_heart_beat(&self, ctx: &mut WebsocketContext<Self>, interval: Duration) {
        let client_timeout = interval * 2;
        ctx.run_interval(interval, move |act, ctx| {
            if Instant::now().duration_since(act.last_receive_time) > client_timeout {
                debug!("{} 心跳超时", act.data.get_info());
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for WsChatSession {
    type Context = WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.data.state = ChatSessionState::Open;
        let id = self.hub.registry.register(ctx.address().recipient());
        self.data.connection_id = Some(id);
        self.data.state = ChatSessionState::Reading;

        debug!("WebSocket {} 连接", self.data.get_info());

        if let Some(interval) = self.hub.heart_beat {
            self.start_heart_beat(ctx, interval);
        }
    }

    fn stopping(&mut self, _ctx: &mut Self::Context) -> Running {
        debug!("WebSocket {} 断开", self.data.get_info());

        if let Some(id) = self.data.connection_id {
            self.hub.registry.unregister(id);
        }
        self.data.state = ChatSessionState::Closed;

        Running::Stop
    }
}

impl ChatSession for WsChatSession {
    fn get_data(&self) -> &ChatSessionData {
        return &self.data;
    }

    fn get_mut_data(&mut self) -> &mut ChatSessionData {
        return &mut self.data;
    }

    fn get_hub(&self) -> web::Data<HubState> {
        return self.hub.clone();
    }
}

impl ActorMessageHandler for WsChatSession {}
impl ClientMessageHandler for WsChatSession {}

impl Handler<SessionActorMessage> for WsChatSession {
    type Result = ();

    fn handle(&mut self, msg: SessionActorMessage, ctx: &mut Self::Context) -> Self::Result {
        self.handle_actor_message(msg, ctx);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsChatSession {
    fn handle(&mut self, item: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        self.last_receive_time = Instant::now();

        let ws_msg = match item {
            Ok(msg) => msg,
            Err(err) => {
                debug!(
                    "{} 发生ws::ProtocolError，关闭连接：{}",
                    self.data.get_info(),
                    err
                );
                ctx.stop();
                return;
            }
        };

        self.handle_client_message(ws_msg.into(), ctx);
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        debug!("{} 的输入流结束", self.data.get_info());
        ctx.stop();
    }
}

/** `live_chat` 建立WebSocket聊天连接
*/
#[get("/LiveChat")]
pub async fn live_chat(
    req: HttpRequest,
    stream: web::Payload,
    hub: web::Data<HubState>,
) -> Result<HttpResponse, actix_web::Error> {
    let addr = match req.peer_addr() {
        Some(addr) => addr,
        None => {
            return Ok(HttpResponse::BadRequest().into());
        }
    };

    ws::start(
        WsChatSession::new(ChatSessionData::new(addr), hub.clone()),
        &req,
        stream,
    )
}
