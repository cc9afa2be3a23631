#![allow(dead_code)]

use std::{
    fmt::Debug,
    net::{SocketAddr, TcpListener},
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use actix_web::{dev::ServerHandle, web, App, HttpServer};
use awc::ws;
use dhub::{
    config::Config,
    server::server_state::{HubState, ServerState},
};
use futures::{Stream, StreamExt};
use serde_json::Value;
use tempfile::TempDir;

pub struct TestHub {
    pub addr: SocketAddr,
    pub hub: web::Data<HubState>,
    pub handle: ServerHandle,
    pub dir: TempDir,
}

impl TestHub {
    pub fn url(&self, path: &str) -> String {
        return format!("http://{}{}", self.addr, path);
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }

    /// 等待在线连接数达到预期
    pub async fn wait_for_connections(&self, expected: usize) {
        self.wait_for_connections_within(expected, Duration::from_secs(2))
            .await;
    }

    pub async fn wait_for_connections_within(&self, expected: usize, limit: Duration) {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if self.hub.registry.len() == expected {
                return;
            }
            actix_rt::time::sleep(Duration::from_millis(20)).await;
        }
        panic!(
            "expected {} connections, found {}",
            expected,
            self.hub.registry.len()
        );
    }

    /// 当前持有日志存储的通知流数量
    pub fn store_holders(&self) -> usize {
        return Arc::strong_count(&self.hub.store) - 1;
    }

    pub async fn wait_for_store_holders(&self, expected: usize, limit: Duration) {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if self.store_holders() == expected {
                return;
            }
            actix_rt::time::sleep(Duration::from_millis(20)).await;
        }
        panic!(
            "expected {} notification streams, found {}",
            expected,
            self.store_holders()
        );
    }

    pub fn data_file(&self) -> PathBuf {
        return self.dir.path().join("data.json");
    }
}

pub async fn start_hub() -> TestHub {
    return start_hub_with(|_| {}).await;
}

pub async fn start_hub_with(customize: impl FnOnce(&mut Config)) -> TestHub {
    let dir = tempfile::tempdir().expect("create temp dir");

    let mut config = Config::default();
    config.store.data_file = dir.path().join("data.json").to_string_lossy().to_string();
    config.upload.upload_dir = dir.path().join("uploads").to_string_lossy().to_string();
    config.notification.poll_interval_ms = 50;
    config.user.heart_beat_time = 0;
    customize(&mut config);

    let hub = web::Data::new(ServerState::start(&config).await.expect("start hub state"));

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    let hub_data = hub.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(hub_data.clone())
            .configure(ServerState::configure_services)
    })
    .workers(1)
    .shutdown_timeout(1)
    .listen(listener)
    .expect("listen")
    .run();

    let handle = server.handle();
    actix_rt::spawn(server);

    return TestHub {
        addr,
        hub,
        handle,
        dir,
    };
}

/// 等待下一个文本帧并解析为JSON
pub async fn next_json<S, E>(connection: &mut S) -> Value
where
    S: Stream<Item = Result<ws::Frame, E>> + Unpin,
    E: Debug,
{
    let frame = actix_rt::time::timeout(Duration::from_secs(2), connection.next())
        .await
        .expect("frame in time")
        .expect("connection open")
        .expect("frame data");

    match frame {
        ws::Frame::Text(bytes) => serde_json::from_slice(&bytes).expect("json frame"),
        other => panic!("unexpected frame: {other:?}"),
    }
}

/// 在给定时间内没有收到任何文本帧
pub async fn assert_no_text<S, E>(connection: &mut S, millis: u64)
where
    S: Stream<Item = Result<ws::Frame, E>> + Unpin,
    E: Debug,
{
    if let Ok(Some(Ok(ws::Frame::Text(bytes)))) =
        actix_rt::time::timeout(Duration::from_millis(millis), connection.next()).await
    {
        panic!("unexpected text frame: {:?}", bytes);
    }
}

/// 从SSE响应体中读取下一个事件的data部分，跳过保活注释帧
pub async fn next_sse_data<S, E>(body: &mut S, buffer: &mut String) -> Value
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Unpin,
    E: Debug,
{
    loop {
        if let Some(end) = buffer.find("\n\n") {
            let event: String = buffer.drain(..end + 2).collect();
            match event.lines().find_map(|line| line.strip_prefix("data: ")) {
                Some(data) => return serde_json::from_str(data).expect("json data"),
                None => continue,
            }
        }

        let chunk = actix_rt::time::timeout(Duration::from_secs(2), body.next())
            .await
            .expect("event in time")
            .expect("stream open")
            .expect("chunk");
        buffer.push_str(std::str::from_utf8(&chunk).expect("utf8 chunk"));
    }
}
