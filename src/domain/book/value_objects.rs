//! Book Context - Value Objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::BookError;

/// 书籍 ID（calibre 数据库主键，必须 > 0）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct BookId(i64);

impl BookId {
    pub fn new(id: i64) -> Result<Self, BookError> {
        if id <= 0 {
            return Err(BookError::InvalidId(id));
        }
        Ok(Self(id))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for BookId {
    type Error = BookError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<BookId> for i64 {
    fn from(id: BookId) -> Self {
        id.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 重复书籍的合并策略（对应 `calibredb add --automerge`）
///
/// - `Ignore`: 忽略重复项，不新增记录（默认）
/// - `Overwrite`: 用新文件覆盖已有记录的文件
/// - `NewRecord`: 新建一条独立记录
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Automerge {
    #[default]
    Ignore,
    Overwrite,
    NewRecord,
}

impl Automerge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Overwrite => "overwrite",
            Self::NewRecord => "new_record",
        }
    }

    /// 解析用户输入，无法识别时回退为 `Ignore`
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_else(|e: BookError| {
            tracing::warn!(error = %e, "Falling back to --automerge=ignore");
            Self::Ignore
        })
    }
}

impl FromStr for Automerge {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(Self::Ignore),
            "overwrite" => Ok(Self::Overwrite),
            "new_record" => Ok(Self::NewRecord),
            other => Err(BookError::InvalidAutomerge(other.to_string())),
        }
    }
}

impl std::fmt::Display for Automerge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
