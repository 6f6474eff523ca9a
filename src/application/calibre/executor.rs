//! Executor - 串行执行 calibredb
//!
//! calibredb 同一时刻只能处理一个操作，并发调用会破坏书库索引。
//! `CalibreExecutor` 持有唯一的串行槽位，所有调用都必须经过它，
//! 与上层有多少请求线程/任务无关。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::application::ports::{ProcessRunnerPort, RunnerError};
use crate::domain::command::CommandRequest;

use super::error::CalibreError;
use super::interpreter::{interpret, CommandOutput, RunOutcome};

/// 串行执行器
pub struct CalibreExecutor {
    runner: Arc<dyn ProcessRunnerPort>,
    /// 串行槽位（tokio Mutex 按 FIFO 唤醒等待者）
    slot: Mutex<()>,
    timeout: Duration,
}

impl CalibreExecutor {
    pub fn new(runner: Arc<dyn ProcessRunnerPort>, timeout: Duration) -> Self {
        Self {
            runner,
            slot: Mutex::new(()),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 执行一条命令
    ///
    /// 等待槽位空闲后运行。超时的子进程由 runner 杀死并回收后才返回，
    /// 槽位在此之前一直被持有。
    pub async fn execute(&self, request: &CommandRequest) -> Result<CommandOutput, CalibreError> {
        let _slot = self.slot.lock().await;

        tracing::debug!(command = %request, "Running calibredb");
        let started = std::time::Instant::now();

        let outcome = match self.runner.run(request, self.timeout).await {
            Ok(output) => RunOutcome::Completed(output),
            Err(RunnerError::TimedOut(limit)) => RunOutcome::TimedOut(limit),
            Err(e) => RunOutcome::Failed(e),
        };

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "calibredb finished"
        );

        interpret(request, outcome)
    }
}
