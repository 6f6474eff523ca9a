//! calibre-rest - calibre 书库的 REST API 服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 书籍实体、BookRecord、值对象
//! - Command Context: 字段白名单、值格式化、calibredb 参数构建（纯函数）
//!
//! 应用层 (application/):
//! - Calibre: 串行执行器、结果解释器、CalibreService
//! - Ports: ProcessRunnerPort
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: tokio 进程执行器、calibredb 定位
//! - HTTP: RESTful API

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
