//! 应用层 - 用例编排
//!
//! 包含：
//! - calibre: calibredb 执行核心（串行执行、超时、结果解释）
//! - ports: 六边形架构端口定义（ProcessRunnerPort）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod calibre;
pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use calibre::{CalibreError, CalibreExecutor, CalibreService, CommandOutput};

pub use commands::{
    AddBook,
    RemoveBooks,
    UpdateBook,
    // Handlers
    handlers::{AddBookHandler, AddBookResponse, RemoveBooksHandler, UpdateBookHandler},
};

pub use error::ApplicationError;

pub use ports::{ProcessOutput, ProcessRunnerPort, RunnerError};

pub use queries::{
    ExportBooks,
    GetBook,
    GetVersion,
    ListBooks,
    // Handlers
    handlers::{
        ExportBooksHandler, GetBookHandler, GetVersionHandler, ListBooksHandler, VersionResponse,
    },
};
