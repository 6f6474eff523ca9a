//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 命令行参数
//! 2. 环境变量
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 命令行覆盖项，`None` 表示不覆盖
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub calibredb: Option<String>,
    pub library: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub log_level: Option<String>,
}

/// 加载应用配置
///
/// # 环境变量示例
/// - `CALIBRE_REST_SERVER__PORT=8080`
/// - `CALIBRE_REST_CALIBRE__CALIBREDB=/usr/bin/calibredb`
/// - `CALIBRE_REST_CALIBRE__LIBRARY=http://localhost:8081/#books`
/// - `CALIBRE_REST_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None, &ConfigOverrides::default())
}

/// 从指定路径加载配置，并应用命令行覆盖项
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
/// - `overrides` - 命令行参数，优先级最高
pub fn load_config_from_path(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "localhost")?
        .set_default("server.port", 5000)?
        .set_default("server.max_upload_size", 100 * 1024 * 1024)?
        .set_default("calibre.calibredb", "/opt/calibre/calibredb")?
        .set_default("calibre.library", "/library")?
        .set_default("calibre.username", "")?
        .set_default("calibre.password", "")?
        .set_default("calibre.timeout_secs", 30)?
        .set_default("calibre.list_limit", 5000)?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量
    // 例如: CALIBRE_REST_CALIBRE__LIBRARY=/books
    builder = builder.add_source(
        Environment::with_prefix("CALIBRE_REST")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 命令行参数（最高优先级）
    builder = builder
        .set_override_option("server.host", overrides.host.clone())?
        .set_override_option("server.port", overrides.port.map(i64::from))?
        .set_override_option("calibre.calibredb", overrides.calibredb.clone())?
        .set_override_option("calibre.library", overrides.library.clone())?
        .set_override_option("calibre.username", overrides.username.clone())?
        .set_override_option("calibre.password", overrides.password.clone())?
        .set_override_option("log.level", overrides.log_level.clone())?;

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.calibre.calibredb.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "calibredb path cannot be empty".to_string(),
        ));
    }

    if config.calibre.library.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Library path cannot be empty".to_string(),
        ));
    }

    if config.calibre.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "calibredb timeout cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志），不输出密码
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Max Upload Size: {} bytes", config.server.max_upload_size);
    tracing::info!("calibredb: {}", config.calibre.calibredb);
    tracing::info!("Library: {}", config.calibre.library);
    if !config.calibre.username.is_empty() {
        tracing::info!("Username: {}", config.calibre.username);
    }
    tracing::info!("Timeout: {}s", config.calibre.timeout_secs);
    match config.calibre.list_limit() {
        Some(limit) => tracing::info!("List Limit: {}", limit),
        None => tracing::info!("List Limit: none"),
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
