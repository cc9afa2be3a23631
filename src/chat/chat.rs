use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::config::datatype::{SessionID, Timestamp};

/** `DEFAULT_SESSION_ID` 通过单次请求写入的消息所属的会话
*/
pub const DEFAULT_SESSION_ID: &str = "default";

/** `utc_now_timestamp` 当前时间，RFC 3339 格式并带有 +00:00 时区
*/
pub fn utc_now_timestamp() -> Timestamp {
    return Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false);
}

/** `generate_id` 生成消息、通知和文件使用的ID
*/
pub fn generate_id() -> String {
    return Uuid::new_v4().to_string();
}

pub fn default_session_id() -> SessionID {
    return DEFAULT_SESSION_ID.to_string();
}
