//! Result Interpreter - 进程结果分类
//!
//! 所有「进程输出 → 类型化结果」的判断都集中在这里。

use std::time::Duration;

use crate::application::ports::{ProcessOutput, RunnerError};
use crate::domain::command::CommandRequest;

use super::error::CalibreError;

/// calibredb 拒绝未知子命令时打印的提示
///
/// calibredb 把这种情况当作受控退出而非崩溃，只能靠这段文本区分。
pub const INVALID_COMMAND_PATTERN: &str = "You must specify a command from the list above";

/// 另一个 calibre 程序正在操作同一书库
const LIBRARY_BUSY_PATTERN: &str = "Another calibre program";

/// 一次调用的执行结果
#[derive(Debug)]
pub enum RunOutcome {
    Completed(ProcessOutput),
    TimedOut(Duration),
    Failed(RunnerError),
}

/// 成功调用的输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    /// 零退出码下的 stderr（calibredb 会在这里输出警告或「已存在」提示）
    pub stderr: String,
}

/// 将执行结果解释为成功输出或类型化错误
pub fn interpret(request: &CommandRequest, outcome: RunOutcome) -> Result<CommandOutput, CalibreError> {
    let command = request.redacted();

    let output = match outcome {
        RunOutcome::Completed(output) => output,
        RunOutcome::TimedOut(limit) | RunOutcome::Failed(RunnerError::TimedOut(limit)) => {
            tracing::error!(command = %command, timeout_secs = limit.as_secs_f64(), "calibredb timed out");
            return Err(CalibreError::ExecutionFailure {
                command,
                exit_code: None,
                stdout: String::new(),
                stderr: format!("Process exceeded the {:?} time limit", limit),
                timed_out: true,
            });
        }
        RunOutcome::Failed(RunnerError::NotFound(reason)) => {
            return Err(CalibreError::NotFound(format!(
                "Executable could not be found.\n\n{}",
                reason
            )));
        }
        RunOutcome::Failed(RunnerError::Io(reason)) => {
            return Err(CalibreError::ExecutionFailure {
                command,
                exit_code: None,
                stdout: String::new(),
                stderr: reason,
                timed_out: false,
            });
        }
    };

    if output.stderr.contains(INVALID_COMMAND_PATTERN) {
        return Err(CalibreError::InvalidCommand { command });
    }

    if !output.success() {
        if output.stderr.contains(LIBRARY_BUSY_PATTERN) {
            tracing::warn!(command = %command, "calibre library is locked by another calibre program");
        }
        return Err(CalibreError::ExecutionFailure {
            command,
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            timed_out: false,
        });
    }

    if !output.stderr.is_empty() {
        tracing::warn!(command = %command, stderr = %output.stderr.trim_end(), "calibredb reported warnings");
    }

    Ok(CommandOutput {
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CommandRequest {
        CommandRequest::new("calibredb", vec!["list".to_string()])
    }

    fn completed(exit_code: Option<i32>, stdout: &str, stderr: &str) -> RunOutcome {
        RunOutcome::Completed(ProcessOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        })
    }

    #[test]
    fn test_zero_exit_is_success() {
        let output = interpret(&request(), completed(Some(0), "[]", "")).unwrap();
        assert_eq!(output.stdout, "[]");
    }

    #[test]
    fn test_stderr_on_success_is_kept() {
        let output = interpret(&request(), completed(Some(0), "", "warning")).unwrap();
        assert_eq!(output.stderr, "warning");
    }

    #[test]
    fn test_unknown_subcommand_is_invalid_command() {
        let stderr = "Usage: calibredb command ...\n\nError: You must specify a command from the list above\n";
        let err = interpret(&request(), completed(Some(1), "", stderr)).unwrap_err();
        assert!(matches!(err, CalibreError::InvalidCommand { .. }));
    }

    #[test]
    fn test_non_zero_exit_is_execution_failure() {
        let err = interpret(&request(), completed(Some(2), "out", "Traceback")).unwrap_err();
        match err {
            CalibreError::ExecutionFailure {
                exit_code,
                stdout,
                stderr,
                timed_out,
                ..
            } => {
                assert_eq!(exit_code, Some(2));
                assert_eq!(stdout, "out");
                assert_eq!(stderr, "Traceback");
                assert!(!timed_out);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_signal_is_execution_failure() {
        let err = interpret(&request(), completed(None, "", "")).unwrap_err();
        assert!(matches!(err, CalibreError::ExecutionFailure { exit_code: None, .. }));
    }

    #[test]
    fn test_timeout_is_execution_failure() {
        let err = interpret(&request(), RunOutcome::TimedOut(Duration::from_secs(3))).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_missing_executable_is_not_found() {
        let outcome = RunOutcome::Failed(RunnerError::NotFound("No such file".to_string()));
        let err = interpret(&request(), outcome).unwrap_err();
        assert!(matches!(err, CalibreError::NotFound(_)));
        assert!(err.to_string().starts_with("Executable could not be found."));
    }
}
