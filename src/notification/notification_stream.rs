use std::{collections::VecDeque, sync::Arc, time::Duration};

use bytes::Bytes;
use futures::Stream;
use log::{debug, error, warn};
use serde::Serialize;
use tokio::sync::watch;

use super::NotificationFilter;
use crate::{
    chat::Notification,
    config::config::{DeliveryMode, NotificationConfig},
    database::{LogStore, StoreError},
};

/** `NotificationEvent` 通知流中每个事件的数据部分
*/
#[derive(Serialize, Debug)]
pub struct NotificationEvent<'a> {
    pub r#type: &'static str,
    pub data: &'a Notification,
}

/// 把一条通知编码成一个SSE事件
pub fn encode_sse_event(notification: &Notification) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_string(&NotificationEvent {
        r#type: "notification",
        data: notification,
    })?;
    return Ok(Bytes::from(format!(
        "event: notification\ndata: {}\n\n",
        json
    )));
}

/// 空闲一个轮询周期后发送的SSE注释帧，写入失败时连接随之释放
pub const KEEP_ALIVE_FRAME: &[u8] = b": keep-alive\n\n";

/** `StreamBatch` 一次等待的结果
*/
#[derive(Debug, PartialEq)]
pub enum StreamBatch {
    Notifications(Vec<Notification>),
    Idle,
}

/** `NotificationStream` 单个客户端的通知订阅。
 * 独立于聊天连接和其他订阅，直到客户端断开（流被丢弃）或读取日志失败才结束
 */
pub struct NotificationStream {
    subscriber: String,
    store: Arc<dyn LogStore>,
    filter: NotificationFilter,
    delivery: DeliveryMode,
    poll_interval: Duration,
    changes: watch::Receiver<usize>,
    cursor: usize,
    polled: bool,
}

impl NotificationStream {
    pub fn new(
        subscriber: impl Into<String>,
        store: Arc<dyn LogStore>,
        filter: NotificationFilter,
        config: &NotificationConfig,
    ) -> Self {
        let changes = store.subscribe();
        let subscriber = subscriber.into();
        debug!("用户 {} 开始订阅通知", subscriber);

        return NotificationStream {
            subscriber,
            store,
            filter,
            delivery: config.delivery,
            poll_interval: config.poll_interval(),
            changes,
            cursor: 0,
            polled: false,
        };
    }

    /// 已经读过的通知数量
    pub fn cursor(&self) -> usize {
        return self.cursor;
    }

    /** `next_batch` 返回下一批通过过滤的通知，没有时等待日志变化。
     * 两次返回之间总会让出一次调度
     */
    pub async fn next_batch(&mut self) -> Result<Vec<Notification>, StoreError> {
        loop {
            if let StreamBatch::Notifications(batch) = self.next_event().await? {
                return Ok(batch);
            }
        }
    }

    /** `next_event` 与 `next_batch` 相同，但等满一个轮询周期仍无新通知时返回 `Idle`
     */
    pub async fn next_event(&mut self) -> Result<StreamBatch, StoreError> {
        if self.polled {
            tokio::task::yield_now().await;
        }
        self.polled = true;

        loop {
            self.changes.borrow_and_update();

            let batch = self.poll_once().await?;
            if !batch.is_empty() {
                return Ok(StreamBatch::Notifications(batch));
            }

            if !self.wait_for_change().await {
                return Ok(StreamBatch::Idle);
            }
        }
    }

    async fn poll_once(&mut self) -> Result<Vec<Notification>, StoreError> {
        let fetched = match self.delivery {
            DeliveryMode::Cursor => {
                let fresh = self.store.read_notifications_from(self.cursor).await?;
                if fresh.is_empty() && *self.changes.borrow() < self.cursor {
                    self.rewind_cursor().await?;
                }
                self.cursor += fresh.len();
                fresh
            }
            DeliveryMode::FullReplay => {
                let all = self.store.read_all().await?.notifications;
                self.cursor = all.len();
                all
            }
        };

        return Ok(fetched
            .into_iter()
            .filter(|notification| self.filter.accepts(notification))
            .collect());
    }

    /** `rewind_cursor` Unguarded 模式下并发写入可能丢失更新，日志变得比游标短。
     * 此时把游标退回到实际长度，之后追加的通知才不会被跳过
     */
    async fn rewind_cursor(&mut self) -> Result<(), StoreError> {
        let total = self.store.read_all().await?.notifications.len();
        if total < self.cursor {
            warn!(
                "用户 {} 的通知流游标 {} 超过日志长度 {}，已回退",
                self.subscriber, self.cursor, total
            );
            self.cursor = total;
        }
        return Ok(());
    }

    /// 日志有变化时返回true，等满一个轮询周期返回false
    async fn wait_for_change(&mut self) -> bool {
        return match tokio::time::timeout(self.poll_interval, self.changes.changed()).await {
            Ok(Ok(())) => true,
            Err(_) => false,
            // 存储已被释放，退回定时轮询
            Ok(Err(_)) => {
                tokio::time::sleep(self.poll_interval).await;
                false
            }
        };
    }

    /** `into_event_stream` 转换为SSE字节流，每条通知是一个独立的事件。
     * 空闲时发送注释帧，客户端断开后写入失败，actix 丢弃整个流
     */
    pub fn into_event_stream(self) -> impl Stream<Item = Bytes> {
        return futures::stream::unfold(
            (self, VecDeque::<Notification>::new()),
            |(mut stream, mut pending)| async move {
                loop {
                    if let Some(notification) = pending.pop_front() {
                        match encode_sse_event(&notification) {
                            Ok(bytes) => return Some((bytes, (stream, pending))),
                            Err(err) => {
                                error!("通知 {} 序列化失败：{}", notification.notification_id, err);
                                continue;
                            }
                        }
                    }

                    match stream.next_event().await {
                        Ok(StreamBatch::Notifications(batch)) => pending.extend(batch),
                        Ok(StreamBatch::Idle) => {
                            return Some((
                                Bytes::from_static(KEEP_ALIVE_FRAME),
                                (stream, pending),
                            ))
                        }
                        Err(err) => {
                            error!("用户 {} 的通知流读取日志失败：{}", stream.subscriber, err);
                            return None;
                        }
                    }
                }
            },
        );
    }
}

impl Drop for NotificationStream {
    fn drop(&mut self) {
        debug!(
            "用户 {} 的通知流结束，共读取 {} 条通知",
            self.subscriber, self.cursor
        );
    }
}
