use std::convert::Infallible;

use actix_web::{get, http::header, web, HttpResponse};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::{
    config::datatype::UserID,
    notification::{NotificationFilter, NotificationStream},
    server::server_state::HubState,
};

/** `GetNotificationsQuery` 订阅通知时的查询参数，
 * `notification_types` 为逗号分隔的类型列表
*/
#[derive(Serialize, Deserialize, Debug)]
pub struct GetNotificationsQuery {
    pub user_id: UserID,
    #[serde(default)]
    pub notification_types: Option<String>,
}

/** `get_notifications` 以SSE持续推送通知，客户端断开时结束
*/
#[get("/GetNotifications")]
pub async fn get_notifications(
    query: web::Query<GetNotificationsQuery>,
    hub: web::Data<HubState>,
) -> HttpResponse {
    let query = query.into_inner();
    let filter = NotificationFilter::from_request(
        &query.user_id,
        query.notification_types.as_deref(),
        hub.notification.filter_by_user_id,
    );

    let stream = NotificationStream::new(
        query.user_id,
        hub.store.clone(),
        filter,
        &hub.notification,
    );

    return HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(stream.into_event_stream().map(Ok::<_, Infallible>));
}
