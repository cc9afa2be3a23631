use actix_web::{error::PayloadError, http::StatusCode, HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

use crate::{database::StoreError, user::user_session::protocol::ErrorFrame};

/** `HubError` HTTP处理函数的错误类型，响应体为 `{"error": ...}`
*/
#[derive(Debug, Error)]
pub enum HubError {
    #[error("{0}")]
    BadRequest(String),

    #[error("internal error")]
    Store(#[from] StoreError),

    #[error("internal error")]
    Io(#[from] std::io::Error),

    #[error("upload interrupted: {0}")]
    Payload(#[from] PayloadError),
}

impl ResponseError for HubError {
    fn status_code(&self) -> StatusCode {
        match self {
            HubError::BadRequest(_) | HubError::Payload(_) => StatusCode::BAD_REQUEST,
            HubError::Store(_) | HubError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("请求处理失败：{:?}", self);
        }
        return HttpResponse::build(self.status_code()).json(ErrorFrame {
            error: self.to_string(),
        });
    }
}
