use std::path::Path;

use actix_web::{error::PayloadError, post, web, HttpResponse};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::HubError;
use crate::{chat::generate_id, config::datatype::FileID, server::server_state::HubState};

/** `UploadFileResponse` 上传完成后的响应
*/
#[derive(Serialize, Deserialize, Debug)]
pub struct UploadFileResponse {
    pub file_id: FileID,
    pub status: String,
    pub size: u64,
}

/** `upload_file` 把请求体原样写入上传目录，不检查内容与大小
*/
#[post("/upload")]
pub async fn upload_file(
    payload: web::Payload,
    hub: web::Data<HubState>,
) -> Result<HttpResponse, HubError> {
    let file_id = generate_id();
    let path = hub.upload_dir.join(format!("uploaded_{}.bin", file_id));
    let file = tokio::fs::File::create(&path).await?;
    let size = save_upload(&path, payload, file).await?;

    info!("文件 {} 上传完成，共 {} 字节", file_id, size);

    return Ok(HttpResponse::Ok().json(UploadFileResponse {
        file_id,
        status: "ok".to_string(),
        size,
    }));
}

/** `save_upload` 把请求体逐块写入 `writer`，返回写入的字节数。
 * 读取请求体或写入失败时删除 `path` 处未完成的文件
 */
pub async fn save_upload<S, W>(path: &Path, body: S, writer: W) -> Result<u64, HubError>
where
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
    W: AsyncWrite + Unpin,
{
    return match write_body(body, writer).await {
        Ok(size) => Ok(size),
        Err(err) => {
            if let Err(remove_err) = tokio::fs::remove_file(path).await {
                warn!("删除未完成的上传 {} 失败：{}", path.display(), remove_err);
            }
            Err(err)
        }
    };
}

// writer 按值传入，返回时文件已关闭
async fn write_body<S, W>(mut body: S, mut writer: W) -> Result<u64, HubError>
where
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut size: u64 = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }
    writer.flush().await?;
    return Ok(size);
}
