//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::calibre::CalibreError;
use crate::domain::book::BookError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} {id} does not exist")]
    NotFound { resource_type: &'static str, id: i64 },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 资源已存在
    #[error("{0}")]
    Conflict(String),

    /// calibredb 输出无法解析
    #[error("Could not parse calibredb output: {0}")]
    InvalidOutput(String),

    /// calibredb 调用失败
    #[error(transparent)]
    Calibre(#[from] CalibreError),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: i64) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<BookError> for ApplicationError {
    fn from(err: BookError) -> Self {
        Self::ValidationError(err.to_string())
    }
}
