//! Book Query Handlers

use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use crate::application::calibre::{CalibreError, CalibreService};
use crate::application::error::ApplicationError;
use crate::application::queries::{ExportBooks, GetBook, GetVersion, ListBooks};
use crate::domain::book::{Book, BookId};

static MISSING_BOOK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"No book with id (\d+) present").expect("valid regex"));

// ============================================================================
// Response DTOs
// ============================================================================

/// 版本信息
#[derive(Debug, Clone, Serialize)]
pub struct VersionResponse {
    pub calibre_version: Option<String>,
    pub calibre_rest_version: &'static str,
}

// ============================================================================
// Helpers
// ============================================================================

/// 解析 `list --for-machine` 输出
pub(crate) fn parse_books(stdout: &str) -> Result<Vec<Book>, ApplicationError> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(stdout).map_err(|e| {
        tracing::error!(error = %e, output = %stdout, "Error decoding calibredb JSON");
        ApplicationError::InvalidOutput(format!("Error decoding JSON: {}", e))
    })
}

/// 按 ID 获取书籍，不存在时返回 `None`
pub(crate) async fn fetch_book(
    calibre: &CalibreService,
    id: BookId,
) -> Result<Option<Book>, ApplicationError> {
    let output = calibre.get_book(id).await?;
    let mut books = parse_books(&output.stdout)?;

    // list 总是返回数组；limit=1 下只应有一个元素
    if books.len() == 1 {
        Ok(books.pop())
    } else {
        Ok(None)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// ListBooks Handler
pub struct ListBooksHandler {
    calibre: Arc<CalibreService>,
    /// 结果数量上限，`None` 表示不限制
    limit: Option<u32>,
}

impl ListBooksHandler {
    pub fn new(calibre: Arc<CalibreService>, limit: Option<u32>) -> Self {
        Self { calibre, limit }
    }

    pub async fn handle(&self, query: ListBooks) -> Result<Vec<Book>, ApplicationError> {
        let output = self
            .calibre
            .list_books(&query.sort, &query.search, self.limit)
            .await?;
        parse_books(&output.stdout)
    }
}

/// GetBook Handler
pub struct GetBookHandler {
    calibre: Arc<CalibreService>,
}

impl GetBookHandler {
    pub fn new(calibre: Arc<CalibreService>) -> Self {
        Self { calibre }
    }

    pub async fn handle(&self, query: GetBook) -> Result<Book, ApplicationError> {
        fetch_book(&self.calibre, query.id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("book", query.id.value()))
    }
}

/// GetVersion Handler
pub struct GetVersionHandler {
    calibre: Arc<CalibreService>,
}

impl GetVersionHandler {
    pub fn new(calibre: Arc<CalibreService>) -> Self {
        Self { calibre }
    }

    pub async fn handle(&self, _query: GetVersion) -> Result<VersionResponse, ApplicationError> {
        let calibre_version = self.calibre.version().await?;
        if calibre_version.is_none() {
            tracing::error!("Failed to parse calibredb version");
        }

        Ok(VersionResponse {
            calibre_version,
            calibre_rest_version: env!("CARGO_PKG_VERSION"),
        })
    }
}

/// ExportBooks Handler - 返回导出目录中的文件（按文件名排序）
pub struct ExportBooksHandler {
    calibre: Arc<CalibreService>,
}

impl ExportBooksHandler {
    pub fn new(calibre: Arc<CalibreService>) -> Self {
        Self { calibre }
    }

    pub async fn handle(&self, query: ExportBooks) -> Result<Vec<PathBuf>, ApplicationError> {
        if query.ids.is_empty() {
            return Err(ApplicationError::validation("No book ids provided"));
        }

        self.calibre
            .export_books(&query.ids, &query.to_dir, &query.formats)
            .await
            .map_err(missing_book)?;

        let files = exported_files(&query.to_dir).await?;
        if files.is_empty() {
            return Err(ApplicationError::internal("calibredb did not export any files"));
        }

        tracing::info!(ids = ?query.ids, files = files.len(), "Books exported");
        Ok(files)
    }
}

/// calibredb 对不存在的 ID 非零退出，并输出 `No book with id <id> present`
fn missing_book(err: CalibreError) -> ApplicationError {
    if let CalibreError::ExecutionFailure { stdout, stderr, .. } = &err {
        let id = MISSING_BOOK_RE
            .captures(stderr)
            .or_else(|| MISSING_BOOK_RE.captures(stdout))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i64>().ok());
        if let Some(id) = id {
            return ApplicationError::not_found("book", id);
        }
    }
    ApplicationError::Calibre(err)
}

async fn exported_files(dir: &Path) -> Result<Vec<PathBuf>, ApplicationError> {
    let read_error = |e: std::io::Error| {
        ApplicationError::internal(format!("Failed to read export directory: {}", e))
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_error)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        if entry.file_type().await.map_err(read_error)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
