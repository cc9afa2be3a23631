/*!
 * 聊天连接：校验、写入并广播客户端发来的消息
*/
mod actor_message_handler;
pub mod client_message_handler;

mod chat_session;
mod ws_chat_session;

pub mod protocol;
pub use chat_session::*;
pub use ws_chat_session::*;
