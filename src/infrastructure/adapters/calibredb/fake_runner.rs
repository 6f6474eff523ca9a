//! Fake Process Runner - 用于测试的进程执行器
//!
//! 按顺序返回预设输出，不启动任何进程，并记录收到的命令

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{ProcessOutput, ProcessRunnerPort, RunnerError};
use crate::domain::command::CommandRequest;

/// Fake Process Runner
#[derive(Default)]
pub struct FakeProcessRunner {
    outputs: Mutex<VecDeque<ProcessOutput>>,
    requests: Mutex<Vec<CommandRequest>>,
}

impl FakeProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预设一次调用的输出
    pub fn push_output(&self, output: ProcessOutput) -> &Self {
        self.outputs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(output);
        self
    }

    /// 预设一次成功调用
    pub fn push_success(&self, stdout: &str, stderr: &str) -> &Self {
        self.push_output(ProcessOutput {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        })
    }

    /// 预设一次失败调用
    pub fn push_failure(&self, exit_code: i32, stderr: &str) -> &Self {
        self.push_output(ProcessOutput {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }

    /// 已执行的命令（按调用顺序）
    pub fn requests(&self) -> Vec<CommandRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ProcessRunnerPort for FakeProcessRunner {
    async fn run(
        &self,
        request: &CommandRequest,
        _timeout: Duration,
    ) -> Result<ProcessOutput, RunnerError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        tracing::debug!(command = %request, "FakeProcessRunner: returning scripted output");

        self.outputs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| RunnerError::Io(format!("no scripted output for {}", request)))
    }
}

/// 以 FakeProcessRunner 组装 CalibreService（本地书库 `/library`）
#[cfg(test)]
pub(crate) fn fake_service(
    runner: std::sync::Arc<FakeProcessRunner>,
) -> crate::application::calibre::CalibreService {
    use crate::application::calibre::{CalibreExecutor, CalibreService};
    use crate::domain::command::{CommandBuilder, LibraryLocation};

    CalibreService::new(
        CommandBuilder::new("calibredb", LibraryLocation::parse("/library"), None),
        CalibreExecutor::new(runner, Duration::from_secs(5)),
    )
}
