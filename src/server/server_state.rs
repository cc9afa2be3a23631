/*!
服务器状态有关的函数
*/

use std::{io, path::PathBuf, sync::Arc, time::Duration};

use actix::Recipient;
use actix_web::web;
use log::info;

use super::connection_registry::ConnectionRegistry;
use crate::config::{config::NotificationConfig, Config};
use crate::database::{self, LogStore};
use crate::user::{http_request, user_session::SessionActorMessage};

/** `SessionRegistry` 所有在线聊天连接组成的连接池
*/
pub type SessionRegistry = ConnectionRegistry<Recipient<SessionActorMessage>>;

/** `HubState` 所有worker共享的服务器状态，通过 `web::Data` 注入到各个处理函数
*/
pub struct HubState {
    pub registry: SessionRegistry,
    pub store: Arc<dyn LogStore>,
    pub notification: NotificationConfig,
    pub heart_beat: Option<Duration>,
    pub upload_dir: PathBuf,
}

pub struct ServerState;

impl ServerState {
    /** `start` 按配置打开日志存储、准备上传目录，返回共享状态
     */
    pub async fn start(config: &Config) -> io::Result<HubState> {
        let store = database::open_log_store(&config.store)
            .await
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        info!("日志存储已就绪：{:?}", config.store.backend);

        let upload_dir = PathBuf::from(&config.upload.upload_dir);
        tokio::fs::create_dir_all(&upload_dir).await?;
        info!("上传文件保存在 {}", upload_dir.display());

        return Ok(HubState {
            registry: SessionRegistry::new(),
            store,
            notification: config.notification.clone(),
            heart_beat: config.user.heart_beat_interval(),
            upload_dir,
        });
    }

    /** `configure_services` 注册所有路由，主程序与集成测试共用
     */
    pub fn configure_services(cfg: &mut web::ServiceConfig) {
        cfg.app_data(http_request::json_config())
            .app_data(http_request::query_config())
            .service(crate::user::user_session::live_chat)
            .service(http_request::send_message)
            .service(http_request::get_notifications)
            .service(http_request::upload_file)
            .service(http_request::publish_notification);
    }
}
