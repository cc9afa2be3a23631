use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use log::debug;
use tokio::{
    fs,
    sync::{watch, Mutex, MutexGuard},
};

use super::{ChangeSignal, LogDocument, LogSnapshot, LogStore, StoreError};
use crate::{
    chat::{generate_id, ChatMessage, Notification},
    config::config::StoreWriteMode,
};

/** `JsonFileStore` 把整份日志保存在一个JSON文件中，
 * 每次修改都读取整个文件、修改后再整体覆盖写回
 */
pub struct JsonFileStore {
    path: PathBuf,
    write_mode: StoreWriteMode,
    write_lock: Mutex<()>,
    changes: ChangeSignal,
}

/** `LogTransaction` 一次读-改-写：begin 时读入的文档，
 * Serialized 模式下同时持有写锁直到 commit
 */
pub struct LogTransaction<'a> {
    pub document: LogDocument,
    _guard: Option<MutexGuard<'a, ()>>,
}

impl JsonFileStore {
    /// 打开日志文件，不存在时创建空日志；文件损坏时直接返回错误
    pub async fn open(
        path: impl Into<PathBuf>,
        write_mode: StoreWriteMode,
    ) -> Result<JsonFileStore, StoreError> {
        let store = JsonFileStore {
            path: path.into(),
            write_mode,
            write_lock: Mutex::new(()),
            changes: ChangeSignal::new(0),
        };

        let document = store.load_document().await?;
        store.changes.publish(document.notifications.len());
        debug!(
            "日志文件 {} 已打开，共 {} 条消息，{} 条通知",
            store.path.display(),
            document.messages.len(),
            document.notifications.len()
        );

        return Ok(store);
    }

    pub fn path(&self) -> &PathBuf {
        return &self.path;
    }

    pub fn write_mode(&self) -> StoreWriteMode {
        return self.write_mode;
    }

    async fn ensure_store(&self) -> Result<(), StoreError> {
        match fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.save_document(&LogDocument::default()).await
            }
            Err(source) => Err(StoreError::Unreadable {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub async fn load_document(&self) -> Result<LogDocument, StoreError> {
        self.ensure_store().await?;

        let bytes = fs::read(&self.path)
            .await
            .map_err(|source| StoreError::Unreadable {
                path: self.path.clone(),
                source,
            })?;

        return serde_json::from_slice::<LogDocument>(&bytes).map_err(|source| {
            StoreError::Corrupted {
                path: self.path.clone(),
                source,
            }
        });
    }

    pub async fn save_document(&self, document: &LogDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|source| StoreError::Unwritable {
                        path: self.path.clone(),
                        source,
                    })?;
            }
        }

        let json =
            serde_json::to_vec_pretty(document).map_err(|source| StoreError::Corrupted {
                path: self.path.clone(),
                source,
            })?;

        // 先写临时文件再改名，读者不会看到写了一半的文件
        let tmp_path = self.path.with_extension(format!("{}.tmp", generate_id()));
        let written = match fs::write(&tmp_path, json).await {
            Ok(()) => fs::rename(&tmp_path, &self.path).await,
            Err(err) => Err(err),
        };

        return match written {
            Ok(()) => Ok(()),
            Err(source) => {
                let _ = fs::remove_file(&tmp_path).await;
                Err(StoreError::Unwritable {
                    path: self.path.clone(),
                    source,
                })
            }
        };
    }

    /** `begin` 开始一次读-改-写。
     * Unguarded 模式下不加锁，两个并发的事务会读到同一份文档，后提交者覆盖先提交者
     */
    pub async fn begin(&self) -> Result<LogTransaction<'_>, StoreError> {
        let guard = match self.write_mode {
            StoreWriteMode::Serialized => Some(self.write_lock.lock().await),
            StoreWriteMode::Unguarded => None,
        };

        let document = self.load_document().await?;

        return Ok(LogTransaction {
            document,
            _guard: guard,
        });
    }

    /// 整体写回事务中的文档并释放写锁
    pub async fn commit(&self, transaction: LogTransaction<'_>) -> Result<(), StoreError> {
        self.save_document(&transaction.document).await?;
        self.changes
            .publish(transaction.document.notifications.len());
        return Ok(());
    }
}

#[async_trait]
impl LogStore for JsonFileStore {
    async fn append_message(&self, msg: ChatMessage) -> Result<ChatMessage, StoreError> {
        let mut transaction = self.begin().await?;
        let stored = transaction.document.append_message(msg);
        self.commit(transaction).await?;
        return Ok(stored);
    }

    async fn append_notification(&self, notification: Notification) -> Result<(), StoreError> {
        let mut transaction = self.begin().await?;
        transaction.document.append_notification(notification);
        return self.commit(transaction).await;
    }

    async fn read_all(&self) -> Result<LogSnapshot, StoreError> {
        return self.load_document().await;
    }

    fn subscribe(&self) -> watch::Receiver<usize> {
        return self.changes.subscribe();
    }
}
