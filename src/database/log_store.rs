use async_trait::async_trait;
use tokio::sync::watch;

use super::{LogSnapshot, StoreError};
use crate::chat::{ChatMessage, Notification};

/** `LogStore` 消息日志的统一异步接口，不同后端实现同一份追加语义。
 * 调用成功返回后，任何调用方随后的 `read_all` 都能看到这次修改。
 */
#[async_trait]
pub trait LogStore: Send + Sync {
    /// 在同一次写入中追加消息和它派生出的通知，返回补全ID后的消息
    async fn append_message(&self, msg: ChatMessage) -> Result<ChatMessage, StoreError>;

    async fn append_notification(&self, notification: Notification) -> Result<(), StoreError>;

    async fn read_all(&self) -> Result<LogSnapshot, StoreError>;

    /// 读取下标不小于offset的通知
    async fn read_notifications_from(
        &self,
        offset: usize,
    ) -> Result<Vec<Notification>, StoreError> {
        let snapshot = self.read_all().await?;
        return Ok(snapshot.notifications.into_iter().skip(offset).collect());
    }

    /// 订阅通知数量的变化
    fn subscribe(&self) -> watch::Receiver<usize>;
}
