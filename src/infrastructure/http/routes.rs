//! HTTP Routes
//!
//! API Endpoints:
//! - /health            GET     calibredb 与服务版本
//! - /books             GET     分页列出书籍（start/limit/sort/search）
//! - /books             POST    上传书籍文件（multipart）
//! - /books             DELETE  批量删除（?id=1,2）
//! - /books/empty       POST    添加空书籍
//! - /books/{id}        GET     获取书籍
//! - /books/{id}        PUT     更新书籍元数据
//! - /books/{id}        DELETE  删除书籍
//! - /export            GET     导出多本书（?id=1,2，zip）
//! - /export/{id}       GET     导出单本书

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/books", book_routes())
        .route("/export", get(handlers::export_books))
        .route("/export/:id", get(handlers::export_book))
}

fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::list_books)
                .post(handlers::add_book)
                .delete(handlers::remove_books),
        )
        .route("/empty", post(handlers::add_empty_book))
        .route(
            "/:id",
            get(handlers::get_book)
                .put(handlers::update_book)
                .delete(handlers::remove_book),
        )
}
