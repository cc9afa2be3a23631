use actix_web::{web, App, HttpServer};
use dhub::{config::Config, server::server_state::ServerState};
use dotenv::dotenv;
use log::info;
use rustls::{Certificate, PrivateKey, ServerConfig};
use rustls_pemfile::{certs, pkcs8_private_keys};

use std::{
    fs::File,
    io::{self, BufReader},
};

#[actix_web::main]
pub async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    Config::init();

    let config = Config::get();
    let hub = web::Data::new(ServerState::start(config).await?);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(hub.clone())
            .configure(ServerState::configure_services)
    })
    .workers(config.http_worker_num.max(1));

    let address = config.server_address();
    let tls_config = &config.tls;

    if tls_config.enable {
        let rust_tls_config =
            load_rustls_config(&tls_config.cert_chain_file, &tls_config.private_key_file)?;
        info!("以TLS方式监听 {}", address);
        return server.bind_rustls(address, rust_tls_config)?.run().await;
    } else {
        info!("监听 {}", address);
        return server.bind(address)?.run().await;
    }
}

fn load_rustls_config(cert_path: &str, key_path: &str) -> io::Result<ServerConfig> {
    // init server config builder with safe defaults
    let config = ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth();

    // load TLS key/cert files
    let cert_file = &mut BufReader::new(File::open(cert_path)?);
    let key_file = &mut BufReader::new(File::open(key_path)?);

    // convert files to key/cert objects
    let cert_chain = certs(cert_file)?.into_iter().map(Certificate).collect();
    let mut keys: Vec<PrivateKey> = pkcs8_private_keys(key_file)?
        .into_iter()
        .map(PrivateKey)
        .collect();

    if keys.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} 中没有PKCS 8私钥", key_path),
        ));
    }

    return config
        .with_single_cert(cert_chain, keys.remove(0))
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err));
}
