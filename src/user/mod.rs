/*!
 * 面向客户端的接口，包括WebSocket聊天连接与HTTP请求处理。
*/

pub mod http_request;
pub mod user_session;
