/*!
 * 聊天消息与通知的数据类型
*/

mod chat;
mod chat_message;
mod notification;

pub use chat::*;
pub use chat_message::*;
pub use notification::*;
