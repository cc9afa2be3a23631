use std::{path::Path, time::Instant};

use futures::{stream, StreamExt};
use log::{debug, warn};

use super::{build_client, LoadError, LoadOptions, LoadReport, RequestStat};

/// 读取请求体文件，读取失败时使用空请求体
pub async fn read_request_body(path: Option<&Path>) -> String {
    let path = match path {
        Some(path) => path,
        None => return String::new(),
    };

    return match tokio::fs::read_to_string(path).await {
        Ok(body) => body,
        Err(err) => {
            warn!("读取请求体文件 {} 失败：{}", path.display(), err);
            String::new()
        }
    };
}

/** `run_http_load` 并发发送JSON POST请求，失败的请求最多重试 `max_retries` 次
 */
pub async fn run_http_load(options: &LoadOptions, body: String) -> Result<LoadReport, LoadError> {
    let client = build_client(Some(options.timeout))?;

    let stats = stream::iter(0..options.request_num)
        .map(|_| send_one(&client, options, &body))
        .buffer_unordered(options.concurrency())
        .collect::<Vec<_>>()
        .await;

    return Ok(LoadReport::new(stats));
}

async fn send_one(client: &reqwest::Client, options: &LoadOptions, body: &str) -> RequestStat {
    let before = Instant::now();
    let mut successful = false;

    for attempt in 0..options.max_retries.max(1) {
        let res = client
            .post(&options.destination)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await;

        match res {
            Ok(resp) if resp.status().is_success() => {
                successful = true;
                break;
            }
            Ok(resp) => debug!("第 {} 次请求返回 {}", attempt + 1, resp.status()),
            Err(err) => debug!("第 {} 次请求失败：{}", attempt + 1, err),
        }
    }

    return RequestStat {
        latency: before.elapsed(),
        events: None,
        successful,
    };
}
