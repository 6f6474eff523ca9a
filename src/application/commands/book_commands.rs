//! Book Commands

use crate::domain::book::{Automerge, BookId, BookRecord};
use crate::domain::command::AddSource;

/// 添加书籍命令（文件或空记录）
#[derive(Debug, Clone)]
pub struct AddBook {
    pub source: AddSource,
    pub record: BookRecord,
    pub automerge: Automerge,
}

/// 更新书籍元数据命令
#[derive(Debug, Clone)]
pub struct UpdateBook {
    pub id: BookId,
    pub record: BookRecord,
}

/// 删除书籍命令
#[derive(Debug, Clone)]
pub struct RemoveBooks {
    pub ids: Vec<BookId>,
    /// 跳过 calibre 回收站，直接删除
    pub permanent: bool,
}
