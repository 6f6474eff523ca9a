//! Command Request - 完整的 calibredb 调用

use std::fmt;
use std::path::{Path, PathBuf};

/// 构建完成的命令（程序路径 + 有序参数）
///
/// 构建后不可变，不持有任何外部资源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandRequest {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// 日志用的命令字符串，`--password` 的值被隐藏
    pub fn redacted(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.display().to_string());

        let mut hide_next = false;
        for arg in &self.args {
            if hide_next {
                parts.push("******".to_string());
                hide_next = false;
                continue;
            }
            hide_next = arg == "--password";
            parts.push(quote_for_display(arg));
        }
        parts.join(" ")
    }
}

impl fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

fn quote_for_display(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        format!("'{}'", arg.replace('\'', "'\\''"))
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_redacts_password() {
        let request = CommandRequest::new(
            "/opt/calibre/calibredb",
            args(&["--with-library", "http://host", "--username", "u", "--password", "secret", "list"]),
        );
        let shown = request.to_string();

        assert!(!shown.contains("secret"));
        assert!(shown.contains("--password ******"));
        assert!(shown.ends_with("list"));
    }

    #[test]
    fn test_display_quotes_arguments_with_spaces() {
        let request = CommandRequest::new("calibredb", args(&["--field", "tags:foo,two words"]));
        assert_eq!(request.to_string(), "calibredb --field 'tags:foo,two words'");
    }
}
