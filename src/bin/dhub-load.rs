use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use dhub::load::{
    read_request_body, run_cs_load, run_http_load, run_sse_load, LoadError, LoadOptions,
};
use dotenv::dotenv;
use log::info;

#[derive(Parser)]
#[command(
    name = "dhub-load",
    version,
    about = "Load generator for the dHub chat and notification endpoints"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Unary JSON POST load, e.g. against /SendMessage
    Http(HttpArgs),
    /// Concurrent SSE subscribers, e.g. against /GetNotifications
    Sse(SseArgs),
    /// Streaming uploads of a generated file, e.g. against /upload
    Cs(CsArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// Full destination including protocol, address, port and url
    #[arg(long, default_value = "http://localhost:8080/")]
    destination: String,
    /// Number of requests to be done
    #[arg(long, default_value_t = 1)]
    reqn: usize,
    /// Number of concurrent requests at the same time
    #[arg(long, default_value_t = 1)]
    conc: usize,
    /// Maximum number of retries per failed request
    #[arg(long, default_value_t = 3)]
    maxr: u32,
}

#[derive(Args)]
struct HttpArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Maximum number of seconds per request
    #[arg(long, default_value_t = 5)]
    timeout: u64,
    /// Path to the file containing the request body
    #[arg(long)]
    reqb_path: Option<PathBuf>,
}

#[derive(Args)]
struct SseArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Seconds each subscriber stays connected
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

#[derive(Args)]
struct CsArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Maximum number of seconds per request
    #[arg(long, default_value_t = 10)]
    timeout: u64,
    /// Size of the file to be uploaded
    #[arg(long, default_value_t = 16 * 1024 * 1024)]
    size: usize,
}

impl CommonArgs {
    fn into_options(self, timeout: u64) -> LoadOptions {
        return LoadOptions {
            destination: self.destination,
            request_num: self.reqn,
            concurrency: self.conc,
            timeout: Duration::from_secs(timeout),
            max_retries: self.maxr,
        };
    }
}

#[tokio::main]
async fn main() -> Result<(), LoadError> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let report = match Cli::parse().command {
        Command::Http(args) => {
            let body = read_request_body(args.reqb_path.as_deref()).await;
            let options = args.common.into_options(args.timeout);
            info!("向 {} 发送 {} 个请求", options.destination, options.request_num);
            run_http_load(&options, body).await?
        }
        Command::Sse(args) => {
            let options = args.common.into_options(args.timeout);
            info!("向 {} 建立 {} 个订阅", options.destination, options.request_num);
            run_sse_load(&options).await?
        }
        Command::Cs(args) => {
            let options = args.common.into_options(args.timeout);
            info!("向 {} 上传 {} 次，每次 {} 字节", options.destination, options.request_num, args.size);
            run_cs_load(&options, args.size).await?
        }
    };

    println!("{}", report);
    return Ok(());
}
