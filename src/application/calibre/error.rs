//! calibredb 调用错误
//!
//! 调用方只会看到这里的几种结果，不会接触到原始进程细节。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalibreError {
    /// 可执行文件或书库不存在（配置错误，启动时即致命）
    #[error("{0}")]
    NotFound(String),

    /// calibredb 不认识该子命令
    #[error("Invalid calibredb command: {command}")]
    InvalidCommand { command: String },

    /// 进程非零退出、被信号终止或超时被杀
    #[error(
        "{command} {}.\n\nSTDOUT:\n{stdout}\nSTDERR:\n{stderr}",
        exit_description(.exit_code, .timed_out)
    )]
    ExecutionFailure {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        timed_out: bool,
    },
}

fn exit_description(exit_code: &Option<i32>, timed_out: &bool) -> String {
    match (exit_code, timed_out) {
        (_, true) => "timed out and was killed".to_string(),
        (Some(code), false) => format!("exited with status {}", code),
        (None, false) => "was terminated by a signal".to_string(),
    }
}

impl CalibreError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ExecutionFailure { timed_out: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_failure_message_includes_streams() {
        let err = CalibreError::ExecutionFailure {
            command: "calibredb foo".to_string(),
            exit_code: Some(1),
            stdout: String::new(),
            stderr: "Error: boom".to_string(),
            timed_out: false,
        };
        let message = err.to_string();

        assert!(message.starts_with("calibredb foo exited with status 1."));
        assert!(message.contains("STDERR:\nError: boom"));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timeout_message() {
        let err = CalibreError::ExecutionFailure {
            command: "calibredb list".to_string(),
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            timed_out: true,
        };

        assert!(err.to_string().contains("timed out and was killed"));
        assert!(err.is_timeout());
    }
}
