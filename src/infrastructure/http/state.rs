//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AddBookHandler, RemoveBooksHandler, UpdateBookHandler,
    // Query handlers
    ExportBooksHandler, GetBookHandler, GetVersionHandler, ListBooksHandler,
    // Core
    CalibreService,
};

/// 应用状态
///
/// 所有 handler 共享同一个 CalibreService，因此共享同一个串行槽位。
pub struct AppState {
    pub calibre: Arc<CalibreService>,

    // ========== Command Handlers ==========
    pub add_book_handler: AddBookHandler,
    pub update_book_handler: UpdateBookHandler,
    pub remove_books_handler: RemoveBooksHandler,

    // ========== Query Handlers ==========
    pub list_books_handler: ListBooksHandler,
    pub get_book_handler: GetBookHandler,
    pub get_version_handler: GetVersionHandler,
    pub export_books_handler: ExportBooksHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// `list_limit` 为 `None` 时列表查询不设上限。
    pub fn new(calibre: Arc<CalibreService>, list_limit: Option<u32>) -> Self {
        Self {
            // Command handlers
            add_book_handler: AddBookHandler::new(calibre.clone()),
            update_book_handler: UpdateBookHandler::new(calibre.clone()),
            remove_books_handler: RemoveBooksHandler::new(calibre.clone()),

            // Query handlers
            list_books_handler: ListBooksHandler::new(calibre.clone(), list_limit),
            get_book_handler: GetBookHandler::new(calibre.clone()),
            get_version_handler: GetVersionHandler::new(calibre.clone()),
            export_books_handler: ExportBooksHandler::new(calibre.clone()),

            calibre,
        }
    }
}
