use std::time::Instant;

use futures::{stream, StreamExt};
use log::debug;

use super::{build_client, LoadError, LoadOptions, LoadReport, RequestStat};

/** `run_sse_load` 并发建立SSE订阅，在超时前统计每个订阅收到的事件数
 */
pub async fn run_sse_load(options: &LoadOptions) -> Result<LoadReport, LoadError> {
    let client = build_client(Some(options.timeout))?;

    let stats = stream::iter(0..options.request_num)
        .map(|_| subscribe_one(&client, options))
        .buffer_unordered(options.concurrency())
        .collect::<Vec<_>>()
        .await;

    return Ok(LoadReport::new(stats));
}

/// 统计以 `data:` 开头的完整行
pub fn count_data_lines(buffer: &mut Vec<u8>, chunk: &[u8]) -> usize {
    buffer.extend_from_slice(chunk);

    let mut events = 0;
    while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=pos).collect();
        if line.len() > 6 && line.starts_with(b"data:") {
            events += 1;
        }
    }
    return events;
}

async fn subscribe_one(client: &reqwest::Client, options: &LoadOptions) -> RequestStat {
    let before = Instant::now();

    let resp = match client.get(&options.destination).send().await {
        Ok(resp) if resp.status().is_success() => resp,
        Ok(resp) => {
            debug!("订阅请求返回 {}", resp.status());
            return RequestStat::failed(before.elapsed());
        }
        Err(err) => {
            debug!("订阅请求失败：{}", err);
            return RequestStat::failed(before.elapsed());
        }
    };

    let mut body = resp.bytes_stream();
    let mut buffer = Vec::new();
    let mut events = 0;
    let mut errors = 0;

    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(chunk) => events += count_data_lines(&mut buffer, &chunk),
            Err(err) => {
                // 超时也以错误的形式出现，此时订阅正常结束
                if err.is_timeout() || errors >= options.max_retries {
                    break;
                }
                errors += 1;
            }
        }
    }

    return RequestStat {
        latency: before.elapsed(),
        events: Some(events),
        successful: true,
    };
}
