//! Export HTTP Handlers

use axum::{
    extract::{Path, RawQuery, State},
    response::Response,
};
use std::sync::Arc;

use crate::application::ExportBooks;
use crate::domain::book::BookId;
use crate::infrastructure::http::dto::{parse_formats, parse_ids};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::export::{download, export_dir};
use crate::infrastructure::http::state::AppState;

/// 导出单本书（`?format=epub` 可限定格式）
pub async fn export_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let id = BookId::new(id)?;
    export(&state, vec![id], query.as_deref()).await
}

/// 导出多本书（`?id=1,2`），多个文件打包为 zip
pub async fn export_books(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let ids = parse_ids(query.as_deref())?;
    export(&state, ids, query.as_deref()).await
}

async fn export(state: &AppState, ids: Vec<BookId>, query: Option<&str>) -> Result<Response, ApiError> {
    // 导出目录在响应体读入内存后才被删除
    let dir = export_dir()?;

    let files = state
        .export_books_handler
        .handle(ExportBooks {
            ids,
            formats: parse_formats(query),
            to_dir: dir.path().to_path_buf(),
        })
        .await?;

    download(files).await
}
