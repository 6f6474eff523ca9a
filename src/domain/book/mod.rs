//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - Book 实体（calibredb `list --for-machine` 输出的结构化形式）
//! - BookRecord（add/update 的输入：有序的字段名 → 值映射）
//! - BookId、Automerge 等值对象

mod entities;
mod errors;
mod record;
mod value_objects;

pub use entities::Book;
pub use errors::BookError;
pub use record::BookRecord;
pub use value_objects::{Automerge, BookId};
