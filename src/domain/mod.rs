//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Book Context: 书籍实体与元数据记录
//! - Command Context: 领域对象 → calibredb 命令行参数

pub mod book;
pub mod command;
