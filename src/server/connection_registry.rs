/*!
连接池：记录当前在线的聊天连接，并负责消息广播
*/

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use log::debug;
use parking_lot::RwLock;
use thiserror::Error;

use crate::config::datatype::ConnectionID;

/** `DeliveryFailure` 向单个连接投递失败，只用于把该连接移出连接池
*/
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("connection closed")]
pub struct DeliveryFailure;

/** `ChatConnection` 连接池中的连接需要具有的特征
*/
pub trait ChatConnection: Send + Sync {
    fn deliver(&self, payload: Arc<String>) -> Result<(), DeliveryFailure>;
}

/** `ConnectionRegistry` 在线连接的集合，所有修改都经过同一把锁，
 * 保留注册顺序
 */
pub struct ConnectionRegistry<C> {
    connections: RwLock<Vec<(ConnectionID, C)>>,
    last_id: AtomicU64,
}

impl<C: ChatConnection> ConnectionRegistry<C> {
    pub fn new() -> Self {
        return ConnectionRegistry {
            connections: RwLock::new(vec![]),
            last_id: AtomicU64::new(0),
        };
    }

    /// 加入连接池，返回该连接的ID
    pub fn register(&self, connection: C) -> ConnectionID {
        let id = self.last_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut connections = self.connections.write();
        connections.push((id, connection));
        debug!("连接 {} 加入连接池，当前在线 {}", id, connections.len());
        return id;
    }

    /// 移出连接池；重复移除或从未注册时什么也不做
    pub fn unregister(&self, id: ConnectionID) -> bool {
        let mut connections = self.connections.write();
        let before = connections.len();
        connections.retain(|(conn_id, _)| *conn_id != id);
        let removed = connections.len() != before;
        if removed {
            debug!("连接 {} 离开连接池，当前在线 {}", id, connections.len());
        }
        return removed;
    }

    /** `broadcast` 向所有在线连接投递同一条消息。
     * 单个连接失败不影响其他连接，失败的连接在返回前被移除，调用方不会收到错误
     */
    pub fn broadcast(&self, payload: Arc<String>) {
        let mut connections = self.connections.write();
        let before = connections.len();

        connections.retain(|(_, connection)| connection.deliver(payload.clone()).is_ok());

        let after = connections.len();
        if before != after {
            debug!(
                "广播时清理了 {} 个失效连接，当前在线 {}",
                before - after,
                after
            );
        }
    }

    pub fn contains(&self, id: ConnectionID) -> bool {
        return self
            .connections
            .read()
            .iter()
            .any(|(conn_id, _)| *conn_id == id);
    }

    pub fn len(&self) -> usize {
        return self.connections.read().len();
    }

    pub fn is_empty(&self) -> bool {
        return self.connections.read().is_empty();
    }
}

impl<C: ChatConnection> Default for ConnectionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
