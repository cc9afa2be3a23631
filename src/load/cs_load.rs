use std::{path::Path, time::Instant};

use futures::{stream, StreamExt};
use log::{debug, warn};

use super::{build_client, LoadError, LoadOptions, LoadReport, RequestStat};
use crate::chat::generate_id;

/** `run_cs_load` 生成一个 `size` 字节的文件，并发地以流的方式上传
 */
pub async fn run_cs_load(options: &LoadOptions, size: usize) -> Result<LoadReport, LoadError> {
    let client = build_client(Some(options.timeout))?;
    let path = std::env::temp_dir().join(format!("dhub-load-{}.bin", generate_id()));

    tokio::fs::write(&path, vec![0u8; size])
        .await
        .map_err(|source| LoadError::UploadFile {
            path: path.clone(),
            source,
        })?;

    let stats = stream::iter(0..options.request_num)
        .map(|_| upload_one(&client, options, &path))
        .buffer_unordered(options.concurrency())
        .collect::<Vec<_>>()
        .await;

    if let Err(err) = tokio::fs::remove_file(&path).await {
        warn!("删除生成的文件 {} 失败：{}", path.display(), err);
    }

    return Ok(LoadReport::new(stats));
}

async fn upload_one(client: &reqwest::Client, options: &LoadOptions, path: &Path) -> RequestStat {
    let before = Instant::now();

    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(err) => {
            warn!("无法打开文件 {}：{}", path.display(), err);
            return RequestStat::failed(before.elapsed());
        }
    };

    let res = client
        .post(&options.destination)
        .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
        .body(reqwest::Body::from(file))
        .send()
        .await;

    let successful = match res {
        Ok(resp) => resp.status().is_success(),
        Err(err) => {
            debug!("上传失败：{}", err);
            false
        }
    };

    return RequestStat {
        latency: before.elapsed(),
        events: None,
        successful,
    };
}

