//! Book Queries

use std::path::PathBuf;

use crate::domain::book::BookId;

/// 列出书籍查询
#[derive(Debug, Clone, Default)]
pub struct ListBooks {
    /// 排序键，`-` 前缀表示降序
    pub sort: Vec<String>,
    /// calibre 搜索语法的搜索词，如 `title:foo`
    pub search: Vec<String>,
}

/// 获取单本书查询
#[derive(Debug, Clone)]
pub struct GetBook {
    pub id: BookId,
}

/// 获取版本信息查询
#[derive(Debug, Clone)]
pub struct GetVersion;

/// 导出书籍文件查询
#[derive(Debug, Clone)]
pub struct ExportBooks {
    pub ids: Vec<BookId>,
    /// 只导出这些格式（如 `epub`），为空时导出全部
    pub formats: Vec<String>,
    /// 导出目录，由调用方创建和清理
    pub to_dir: PathBuf,
}
