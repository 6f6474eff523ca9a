//! Process Runner Port - 外部进程执行抽象
//!
//! 只负责「启动进程、等待结束、收集输出」，不做任何结果分类。
//! 串行化和超时由 `CalibreExecutor` 负责，分类由结果解释器负责。

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::command::CommandRequest;

/// 进程启动错误
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Executable could not be found: {0}")]
    NotFound(String),

    #[error("Failed to run process: {0}")]
    Io(String),

    /// 超过时限，子进程已被杀死并回收
    #[error("Process exceeded the {0:?} time limit")]
    TimedOut(Duration),
}

impl From<std::io::Error> for RunnerError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

/// 进程结束后的原始输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// 退出码，被信号终止时为 `None`
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Process Runner Port
///
/// 完整缓冲 stdout/stderr，直到进程退出。
/// 超过 `timeout` 时必须先杀死并回收子进程，再返回 `RunnerError::TimedOut`。
#[async_trait]
pub trait ProcessRunnerPort: Send + Sync {
    async fn run(
        &self,
        request: &CommandRequest,
        timeout: Duration,
    ) -> Result<ProcessOutput, RunnerError>;
}
