/*! 配置文件解析 */

use std::{
    fs::{self, File},
    io::{Read, Write},
    path::PathBuf,
    time::Duration,
};

use log::{info, warn};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static CONFIG: OnceCell<Config> = OnceCell::new();

/// 覆盖配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "DHUB_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/** `Config` 配置信息的数据类型
 */
#[derive(Serialize, Debug, Deserialize, Clone)]
pub struct Config {
    pub http_worker_num: usize,
    pub server: ServerConfig,
    pub tls: TlsConfig,
    pub store: StoreConfig,
    pub notification: NotificationConfig,
    pub upload: UploadConfig,
    pub user: UserConfig,
}

/** `ServerConfig` 监听地址
 */
#[derive(Serialize, Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/** `TlsConfig` tls有关的配置信息的数据类型
 */
#[derive(Serialize, Debug, Deserialize, Clone)]
pub struct TlsConfig {
    pub enable: bool,
    pub private_key_file: String,
    pub cert_chain_file: String,
}

/** `StoreBackend` 消息日志的存储后端
 */
#[derive(Serialize, Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// 单个JSON文件，每次写入整体覆盖
    JsonFile,
    /// 仅存在于内存，进程退出即丢失
    Memory,
}

/** `StoreWriteMode` 文件存储的写入方式
 */
#[derive(Serialize, Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreWriteMode {
    /// 整个读-改-写过程持有写锁
    Serialized,
    /// 不加锁，并发写入时后写者覆盖先写者，可能丢失追加
    Unguarded,
}

/** `StoreConfig` 消息日志的配置信息的数据类型
 */
#[derive(Serialize, Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_file: String,
    pub write_mode: StoreWriteMode,
}

/** `DeliveryMode` 通知流的投递方式
 */
#[derive(Serialize, Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// 每个订阅者维护游标，只发送新增的通知
    Cursor,
    /// 每一轮都重新发送全部历史通知
    FullReplay,
}

/** `NotificationConfig` 通知流的配置信息的数据类型
 */
#[derive(Serialize, Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    pub delivery: DeliveryMode,
    /// 没有新通知时，两次读取存储之间的最长等待时间
    pub poll_interval_ms: u64,
    /// 是否按请求中的user_id过滤通知
    pub filter_by_user_id: bool,
}

impl NotificationConfig {
    pub fn poll_interval(&self) -> Duration {
        return Duration::from_millis(self.poll_interval_ms.max(1));
    }
}

/** `UploadConfig` 文件上传的配置信息的数据类型
 */
#[derive(Serialize, Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub upload_dir: String,
}

/** `UserConfig` 用户连接的配置信息的数据类型
 */
#[derive(Serialize, Debug, Deserialize, Clone)]
pub struct UserConfig {
    /// 心跳超时秒数，为0时不检查
    pub heart_beat_time: u32,
}

impl UserConfig {
    pub fn heart_beat_interval(&self) -> Option<Duration> {
        if self.heart_beat_time == 0 {
            return None;
        }
        return Some(Duration::from_secs(self.heart_beat_time.into()));
    }
}

impl Default for Config {
    fn default() -> Config {
        let core_num = num_cpus::get();
        Config {
            http_worker_num: core_num,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            tls: TlsConfig {
                enable: false,
                private_key_file: "private.pem".to_string(),
                cert_chain_file: "cert.pem".to_string(),
            },
            store: StoreConfig {
                backend: StoreBackend::JsonFile,
                data_file: "data.json".to_string(),
                write_mode: StoreWriteMode::Serialized,
            },
            notification: NotificationConfig {
                delivery: DeliveryMode::Cursor,
                poll_interval_ms: 500,
                filter_by_user_id: false,
            },
            upload: UploadConfig {
                upload_dir: "uploads".to_string(),
            },
            user: UserConfig { heart_beat_time: 30 },
        }
    }
}

impl Config {
    /** `init` 试图读取配置文件，生成Config；
     * 找不到配置文件时写入并使用默认配置
     */
    pub fn init() {
        let path = Self::get_config_path();
        let config = match Self::try_read_from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!("未能读取配置文件 {}：{}，使用默认配置", path.display(), err);
                let config = Config::default();
                if let Err(err) = config.write_to_file(&path) {
                    warn!("默认配置文件写入失败：{}", err);
                } else {
                    info!("默认配置文件写入到 {}", path.display());
                }
                config
            }
        };

        CONFIG.set(config).expect("Config重复初始化");
    }

    /** `get` 调用已初始化的CONFIG
     */
    pub fn get() -> &'static Config {
        return CONFIG.get().expect("Config未初始化");
    }

    pub fn server_address(&self) -> String {
        return format!("{}:{}", self.server.host, self.server.port);
    }

    fn get_config_path() -> PathBuf {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn try_read_from_file(path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;

        let mut json = String::new();
        file.read_to_string(&mut json)?;

        let obj = serde_json::from_str(&json)?;

        return Ok(obj);
    }

    pub fn write_to_file(&self, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        return Ok(());
    }
}
