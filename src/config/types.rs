//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::domain::command::{Credentials, LibraryLocation};

/// 支持的日志级别
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// calibredb 配置
    #[serde(default)]
    pub calibre: CalibreConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体最大大小（字节），默认 100MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_size() -> usize {
    100 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// calibredb 配置
#[derive(Clone, Deserialize)]
pub struct CalibreConfig {
    /// calibredb 可执行文件（路径或 PATH 中的命令名）
    #[serde(default = "default_calibredb")]
    pub calibredb: String,

    /// 书库目录，或 `http(s)://` 开头的远程内容服务器地址
    #[serde(default = "default_library")]
    pub library: String,

    /// 远程书库用户名
    #[serde(default)]
    pub username: String,

    /// 远程书库密码
    #[serde(default)]
    pub password: String,

    /// 单条命令超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// 列表查询的最大结果数，0 表示不限制
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
}

fn default_calibredb() -> String {
    "/opt/calibre/calibredb".to_string()
}

fn default_library() -> String {
    "/library".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_list_limit() -> u32 {
    5000
}

impl Default for CalibreConfig {
    fn default() -> Self {
        Self {
            calibredb: default_calibredb(),
            library: default_library(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout(),
            list_limit: default_list_limit(),
        }
    }
}

impl CalibreConfig {
    pub fn library_location(&self) -> LibraryLocation {
        LibraryLocation::parse(&self.library)
    }

    /// 用户名和密码都配置时才有凭据
    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(&self.username, &self.password)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn list_limit(&self) -> Option<u32> {
        (self.list_limit > 0).then_some(self.list_limit)
    }
}

impl std::fmt::Debug for CalibreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibreConfig")
            .field("calibredb", &self.calibredb)
            .field("library", &self.library)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "******" })
            .field("timeout_secs", &self.timeout_secs)
            .field("list_limit", &self.list_limit)
            .finish()
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LogConfig {
    /// 规范化的日志级别，不支持的级别返回 `None`
    ///
    /// 接受大小写混写，`warning` 视为 `warn`。
    pub fn normalized_level(&self) -> Option<&'static str> {
        let level = self.level.trim().to_ascii_lowercase();
        let level = if level == "warning" { "warn".to_string() } else { level };
        LOG_LEVELS.iter().copied().find(|l| *l == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr(), "localhost:5000");
        assert_eq!(config.server.max_upload_size, 100 * 1024 * 1024);
        assert_eq!(config.calibre.calibredb, "/opt/calibre/calibredb");
        assert_eq!(config.calibre.library, "/library");
        assert_eq!(config.calibre.timeout(), Duration::from_secs(30));
        assert_eq!(config.calibre.list_limit(), Some(5000));
    }

    #[test]
    fn test_zero_list_limit_means_unlimited() {
        let config = CalibreConfig {
            list_limit: 0,
            ..CalibreConfig::default()
        };
        assert_eq!(config.list_limit(), None);
    }

    #[test]
    fn test_credentials_and_debug_output() {
        let config = CalibreConfig {
            library: "http://localhost:8080/#books".to_string(),
            username: "reader".to_string(),
            password: "hunter2".to_string(),
            ..CalibreConfig::default()
        };
        assert!(config.library_location().is_remote());
        assert!(config.credentials().is_some());
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn test_log_level_normalization() {
        let level = |s: &str| LogConfig { level: s.to_string() }.normalized_level();
        assert_eq!(level("INFO"), Some("info"));
        assert_eq!(level("WARNING"), Some("warn"));
        assert_eq!(level("verbose"), None);
    }
}
