//! Command-line arguments
//!
//! 命令行参数优先级高于环境变量和配置文件。
//! 每个参数也可以通过对应的 `CALIBRE_REST_*` 环境变量给出（如 `CALIBRE_REST_LIBRARY`），
//! 显式传入的参数优先。

use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// calibre-rest - REST API server for a calibre library
#[derive(Parser, Debug)]
#[command(name = "calibre-rest")]
#[command(version)]
#[command(about = "REST API server wrapping calibredb", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml / config.local.toml if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start in dev mode (log level defaults to debug)
    #[arg(short, long)]
    pub dev: bool,

    /// Path to the calibredb executable
    #[arg(short = 'c', long = "calibre", value_name = "PATH", env = "CALIBRE_REST_PATH")]
    pub calibredb: Option<String>,

    /// Path to the calibre library, or the URL of a calibre content server
    #[arg(short, long, env = "CALIBRE_REST_LIBRARY")]
    pub library: Option<String>,

    /// Username for a remote library
    #[arg(short, long, env = "CALIBRE_REST_USERNAME")]
    pub username: Option<String>,

    /// Password for a remote library
    #[arg(short, long, env = "CALIBRE_REST_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'g', long, env = "CALIBRE_REST_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Bind address
    #[arg(
        short,
        long,
        value_name = "HOST:PORT",
        value_parser = parse_bind,
        env = "CALIBRE_REST_ADDR"
    )]
    pub bind: Option<BindAddr>,
}

/// `HOST:PORT` 监听地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindAddr {
    pub host: String,
    pub port: u16,
}

fn parse_bind(raw: &str) -> Result<BindAddr, String> {
    let (host, port) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected HOST:PORT, got '{}'", raw))?;
    let port = port
        .parse::<u16>()
        .map_err(|e| format!("invalid port '{}': {}", port, e))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(format!("missing host in '{}'", raw));
    }

    Ok(BindAddr {
        host: host.to_string(),
        port,
    })
}

impl Cli {
    /// 转换为配置覆盖项
    pub fn overrides(&self) -> ConfigOverrides {
        let log_level = self
            .log_level
            .clone()
            .or_else(|| self.dev.then(|| "debug".to_string()));

        ConfigOverrides {
            host: self.bind.as_ref().map(|b| b.host.clone()),
            port: self.bind.as_ref().map(|b| b.port),
            calibredb: self.calibredb.clone(),
            library: self.library.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            log_level,
        }
    }
}
