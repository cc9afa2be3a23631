/*!
 * # dHub
 * 实时聊天与通知服务的后端逻辑
*/

pub mod chat;
pub mod config;
pub mod database;
pub mod load;
pub mod notification;
pub mod server;
pub mod user;

#[cfg(test)]
pub mod tests;
