use std::io::{Error, ErrorKind};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::middleware::Logger;
use actix_web::web::{Data, PayloadConfig};
use actix_web::{App, HttpServer};

use chrono::Utc;
use log::info;

use crate::api::{routes, AppState};

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub concurrent: usize,
    pub keep_alive: u64,
    pub shutdown_timeout: u64,
    pub payload_limit: usize,
}

impl ServerConfig {
    pub fn from_env() -> std::io::Result<ServerConfig> {
        let cores = std::thread::available_parallelism()
            .map(|cores| cores.get())
            .unwrap_or(1);

        Ok(ServerConfig {
            host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("SERVER_PORT", 8080)?,
            concurrent: parse_env("SERVER_CONCURRENT", cores)?,
            keep_alive: parse_env("SERVER_KEEP_ALIVE", 100)?,
            shutdown_timeout: parse_env("SERVER_SHUTDOWN_TIMEOUT", 30)?,
            payload_limit: parse_env("SERVER_PAYLOAD_LIMIT", 262_144)?,
        })
    }

    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> ServerConfig {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> std::io::Result<T> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|_| Error::new(ErrorKind::InvalidInput, format!("Invalid {}", key))),
        Err(_) => Ok(default),
    }
}

pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    if config.concurrent == 0 {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "Invalid SERVER_CONCURRENT",
        ));
    }

    // @NOTE: store appstate
    let appstate = Arc::new(AppState::new());
    let appstate_for_release = appstate.clone();
    let payload_limit = config.payload_limit;

    // @NOTE: spawn new http server
    let server = HttpServer::new(move || {
        App::new()
            // @NOTE: monitoring
            .wrap(Logger::default())
            // @NOTE: request body limit
            .app_data(PayloadConfig::new(payload_limit))
            // @NOTE: APIs of pools
            .configure(routes)
            // @NOTE: AppState
            .app_data(Data::new(appstate.clone()))
    })
    .workers(config.concurrent)
    .keep_alive(Duration::from_secs(config.keep_alive))
    .bind((config.host.as_str(), config.port))
    .map_err(|e| {
        Error::new(
            ErrorKind::AddrInUse,
            format!("Failed to bind to {}:{}: {}", config.host, config.port, e),
        )
    })?
    .shutdown_timeout(config.shutdown_timeout)
    .run();

    info!(
        "Server running on http://{}:{} with {} workers, started at {}",
        config.host,
        config.port,
        config.concurrent,
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
    );

    // @NOTE: actix handles SIGINT/SIGTERM and drains the workers
    let ok = server.await;

    info!(
        "Server is downed gracefully, {} pools were held in memory",
        appstate_for_release.pools().len()
    );
    ok
}
