/*!
 * 压测客户端：并发调用单次写入、通知订阅与文件上传接口
*/

mod cs_load;
mod http_load;
mod sse_load;
mod stats;

use std::{path::PathBuf, time::Duration};

use thiserror::Error;

pub use cs_load::*;
pub use http_load::*;
pub use sse_load::*;
pub use stats::*;

/** `LoadOptions` 三种压测共用的参数
*/
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// 完整的目标地址，包括协议、端口、路径与查询参数
    pub destination: String,
    pub request_num: usize,
    pub concurrency: usize,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl LoadOptions {
    fn concurrency(&self) -> usize {
        return self.concurrency.max(1);
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to prepare upload file {path}: {source}")]
    UploadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, LoadError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    return Ok(builder.build()?);
}
