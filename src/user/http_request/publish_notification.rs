use actix_web::{post, web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use super::HubError;
use crate::{
    chat::{generate_id, utc_now_timestamp, Notification, NotificationPriority},
    config::datatype::{Timestamp, UserID},
    server::server_state::HubState,
};

/** `PublishNotificationRequest` 发布非聊天通知（如 system、alert）时所用的数据类型
*/
#[derive(Serialize, Deserialize, Debug)]
pub struct PublishNotificationRequest {
    pub user_id: UserID,
    pub r#type: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub priority: NotificationPriority,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl PublishNotificationRequest {
    pub fn into_notification(self) -> Notification {
        let timestamp = match self.timestamp {
            Some(timestamp) if !timestamp.is_empty() => timestamp,
            _ => utc_now_timestamp(),
        };

        return Notification {
            notification_id: generate_id(),
            user_id: self.user_id,
            r#type: self.r#type,
            title: self.title,
            content: self.content,
            timestamp,
            priority: self.priority,
        };
    }
}

#[post("/PublishNotification")]
pub async fn publish_notification(
    json: web::Json<PublishNotificationRequest>,
    hub: web::Data<HubState>,
) -> Result<HttpResponse, HubError> {
    let request = json.into_inner();
    if request.r#type.is_empty() {
        return Err(HubError::BadRequest("notification type is empty".to_string()));
    }

    let notification = request.into_notification();
    hub.store.append_notification(notification.clone()).await?;

    info!(
        "向用户 {} 发布 {} 通知 {}",
        notification.user_id, notification.r#type, notification.notification_id
    );

    return Ok(HttpResponse::Ok().json(notification));
}
