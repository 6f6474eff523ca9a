//! calibre-rest - calibre 书库的 REST API 服务
//!
//! 启动流程: 加载配置 → 初始化日志 → 定位 calibredb → 健康检查 → 启动 HTTP 服务

use std::sync::Arc;

use clap::Parser;

use calibre_rest::application::{CalibreExecutor, CalibreService};
use calibre_rest::cli::Cli;
use calibre_rest::config::{load_config_from_path, print_config};
use calibre_rest::domain::command::CommandBuilder;
use calibre_rest::infrastructure::adapters::{check_library, locate_calibredb, TokioProcessRunner};
use calibre_rest::infrastructure::http::{AppState, HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：命令行 > 环境变量 > 配置文件 > 默认值）
    let config = load_config_from_path(cli.config.as_deref(), &cli.overrides())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let level = config.log.normalized_level().unwrap_or("info");
    let log_filter = format!("{},calibre_rest={},tower_http={}", level, level, level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    if config.log.normalized_level().is_none() {
        tracing::warn!(
            level = %config.log.level,
            "Log level not supported, falling back to info"
        );
    }

    tracing::info!("calibre-rest v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 定位 calibredb 与书库，任何一项缺失都无法提供服务
    let calibredb = locate_calibredb(&config.calibre.calibredb)?;
    let library = config.calibre.library_location();
    check_library(&library)?;

    let commands = CommandBuilder::new(calibredb, library, config.calibre.credentials());
    let executor = CalibreExecutor::new(Arc::new(TokioProcessRunner::new()), config.calibre.timeout());
    let calibre = Arc::new(CalibreService::new(commands, executor));

    let version = calibre.verify().await?;
    tracing::info!(calibre_version = %version, "calibredb ready");

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(
        &config.server.host,
        config.server.port,
        config.server.max_upload_size,
    );
    let state = AppState::new(calibre, config.calibre.list_limit());
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
