//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：添加、更新、删除书籍

mod book_commands;

pub mod handlers;

pub use book_commands::*;
