//! Tokio Process Runner - 基于 tokio::process 的进程执行器
//!
//! 参数以列表形式直接传给进程，不经过 shell。

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::application::ports::{ProcessOutput, ProcessRunnerPort, RunnerError};
use crate::domain::command::CommandRequest;

/// Tokio Process Runner
#[derive(Debug, Default, Clone)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunnerPort for TokioProcessRunner {
    async fn run(
        &self,
        request: &CommandRequest,
        timeout: Duration,
    ) -> Result<ProcessOutput, RunnerError> {
        let mut child = Command::new(request.program())
            .args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                tracing::error!(
                    program = %request.program().display(),
                    error = %e,
                    "Failed to spawn process"
                );
                RunnerError::from(e)
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let finished = tokio::time::timeout(timeout, async {
            tokio::try_join!(child.wait(), read_stream(stdout), read_stream(stderr))
        })
        .await;

        match finished {
            Ok(Ok((status, stdout, stderr))) => Ok(ProcessOutput {
                exit_code: status.code(),
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            }),
            Ok(Err(e)) => Err(RunnerError::from(e)),
            Err(_) => {
                // kill 先发送 SIGKILL，再等待子进程退出并回收
                if let Err(e) = child.kill().await {
                    tracing::warn!(
                        pid = ?child.id(),
                        error = %e,
                        "Failed to kill timed out process"
                    );
                }
                Err(RunnerError::TimedOut(timeout))
            }
        }
    }
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
