/*!
 * HTTP接口：单次写入、通知订阅、文件上传与通知发布
*/

mod get_notifications;
mod hub_error;
mod publish_notification;
mod send_message;
mod upload_file;

use actix_web::web;

pub use get_notifications::*;
pub use hub_error::*;
pub use publish_notification::*;
pub use send_message::*;
pub use upload_file::*;

/// 请求体无法解析时返回 400 `{"error": ...}`
pub fn json_config() -> web::JsonConfig {
    return web::JsonConfig::default()
        .error_handler(|err, _req| HubError::BadRequest(err.to_string()).into());
}

pub fn query_config() -> web::QueryConfig {
    return web::QueryConfig::default()
        .error_handler(|err, _req| HubError::BadRequest(err.to_string()).into());
}
