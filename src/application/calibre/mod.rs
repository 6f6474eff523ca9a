//! Calibre Core - calibredb 执行核心
//!
//! - executor: 串行槽位 + 超时
//! - interpreter: 进程结果 → 成功输出 / 类型化错误
//! - service: 对外边界（list/add/update/remove/verify）

mod error;
mod executor;
mod interpreter;
mod service;

pub use error::CalibreError;
pub use executor::CalibreExecutor;
pub use interpreter::{interpret, CommandOutput, RunOutcome, INVALID_COMMAND_PATTERN};
pub use service::CalibreService;
