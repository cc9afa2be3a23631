/*! 数据类型定义 */

// Chat
/** `MessageID` 消息ID，客户端未提供时由服务端生成UUID
*/
pub type MessageID = String;

/** `SessionID` 聊天会话ID
*/
pub type SessionID = String;

// User
/** `UserID` 用户ID
*/
pub type UserID = String;

// Notification
/** `NotificationID` 通知ID，总是由服务端生成
*/
pub type NotificationID = String;

// Connection
/** `ConnectionID` 连接池中一条连接的标识
*/
pub type ConnectionID = u64;

/** `Timestamp` ISO-8601 时间字符串
*/
pub type Timestamp = String;

/** `FileID` 上传文件ID
*/
pub type FileID = String;
