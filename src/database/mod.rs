/*!
 * 消息日志存储，为不同的存储后端提供统一的异步接口。
*/

mod common;
mod json_file;
mod log_store;
mod memory;

use std::sync::Arc;

pub use common::*;
pub use json_file::*;
pub use log_store::*;
pub use memory::*;

use crate::config::config::{StoreBackend, StoreConfig};

/// 按配置打开日志存储
pub async fn open_log_store(config: &StoreConfig) -> Result<Arc<dyn LogStore>, StoreError> {
    return match config.backend {
        StoreBackend::JsonFile => Ok(Arc::new(
            JsonFileStore::open(&config.data_file, config.write_mode).await?,
        )),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    };
}
