//! Library Location - calibre 书库位置与凭据

use std::path::PathBuf;

/// 书库位置：本地目录或远程 calibre 内容服务器
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryLocation {
    Local(PathBuf),
    /// 形如 `http://host:8080/#library_id`
    Remote(String),
}

impl LibraryLocation {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Remote(raw.to_string())
        } else {
            Self::Local(PathBuf::from(raw))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// `--with-library` 的参数值
    pub fn as_arg(&self) -> String {
        match self {
            Self::Local(path) => path.display().to_string(),
            Self::Remote(url) => url.clone(),
        }
    }
}

/// 远程书库凭据
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// 用户名和密码都非空时才构造凭据
    pub fn from_parts(username: &str, password: &str) -> Option<Self> {
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"******")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert!(LibraryLocation::parse("https://books.example.com/#main").is_remote());
        assert_eq!(
            LibraryLocation::parse("/library"),
            LibraryLocation::Local(PathBuf::from("/library"))
        );
    }

    #[test]
    fn test_credentials_require_both_parts() {
        assert!(Credentials::from_parts("user", "").is_none());
        assert!(Credentials::from_parts("", "pass").is_none());
        assert!(Credentials::from_parts("user", "pass").is_some());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::from_parts("user", "hunter2").unwrap();
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
