//! Command Context - calibredb 命令翻译
//!
//! 职责:
//! - Field Validator: add/update 的字段白名单与值形态
//! - Value Formatter: 字段值 → calibredb 参数文本
//! - Command Builder: 组装 sort/search/add/update 等完整参数
//!
//! 本模块全部是纯函数，不执行任何进程。

mod builder;
mod fields;
mod format;
mod library;
mod request;
mod sort;

pub use builder::{
    with_add_fields, with_search, with_sort, with_update_fields, AddSource, CommandBuilder,
};
pub use fields::{settable, FieldShape, FieldSpec, OperationKind, AUTHOR_SEPARATOR, LIST_SEPARATOR};
pub use format::{format_value, Rendered};
pub use library::{Credentials, LibraryLocation};
pub use request::CommandRequest;
pub use sort::{SortKey, SortSpec, SORTABLE_FIELDS};
