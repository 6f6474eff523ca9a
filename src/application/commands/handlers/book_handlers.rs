//! Book Command Handlers

use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::application::calibre::{CalibreService, CommandOutput};
use crate::application::commands::{AddBook, RemoveBooks, UpdateBook};
use crate::application::error::ApplicationError;
use crate::application::queries::handlers::fetch_book;
use crate::domain::book::Book;
use crate::domain::command::{with_update_fields, AddSource};

static BOOK_ADDED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Added book ids: ([0-9, ]+)").expect("valid regex"));
static BOOK_MERGED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Merged book ids: ([0-9, ]+)").expect("valid regex"));
static BOOK_IGNORED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^The following books were not added as they already exist")
        .expect("valid regex")
});

// ============================================================================
// AddBook
// ============================================================================

/// 添加书籍响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBookResponse {
    /// 新增或被合并的书籍 ID
    pub ids: Vec<i64>,
    /// 是否合并进了已有记录
    pub merged: bool,
}

/// AddBook Handler
pub struct AddBookHandler {
    calibre: Arc<CalibreService>,
}

impl AddBookHandler {
    pub fn new(calibre: Arc<CalibreService>) -> Self {
        Self { calibre }
    }

    pub async fn handle(&self, command: AddBook) -> Result<AddBookResponse, ApplicationError> {
        if let AddSource::Files(paths) = &command.source {
            if paths.is_empty() {
                return Err(ApplicationError::validation("No file(s) provided"));
            }
            if let Some(missing) = paths.iter().find(|p| !p.exists()) {
                return Err(ApplicationError::validation(format!(
                    "Failed to find book at {}",
                    missing.display()
                )));
            }
        }

        let output = self
            .calibre
            .add_book(&command.source, &command.record, command.automerge)
            .await?;

        let response = parse_add_output(&output)?;

        tracing::info!(
            ids = ?response.ids,
            merged = response.merged,
            automerge = %command.automerge,
            "Book added"
        );

        Ok(response)
    }
}

/// 解析 `calibredb add` 输出
///
/// 已存在的书籍在零退出码下通过 stderr 报告，视为冲突。
fn parse_add_output(output: &CommandOutput) -> Result<AddBookResponse, ApplicationError> {
    if BOOK_IGNORED_RE.is_match(&output.stderr) {
        let existing = output.stdout.trim_matches(|c: char| c == '\n' || c == ' ');
        tracing::info!(books = %existing, "Books already exist, ignoring");
        return Err(ApplicationError::Conflict(format!(
            "Book {} already exists. Include automerge=overwrite to overwrite.",
            existing
        )));
    }

    let (captures, merged) = match BOOK_MERGED_RE.captures(&output.stdout) {
        Some(caps) => (caps, true),
        None => match BOOK_ADDED_RE.captures(&output.stdout) {
            Some(caps) => (caps, false),
            None => {
                tracing::error!(
                    stdout = %output.stdout,
                    stderr = %output.stderr,
                    "Could not parse calibredb add output"
                );
                return Err(ApplicationError::InvalidOutput(
                    "Could not parse calibredb add output".to_string(),
                ));
            }
        },
    };

    let ids: Vec<i64> = captures
        .get(1)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .split(',')
        .filter_map(|id| id.trim().parse().ok())
        .collect();

    if ids.is_empty() {
        return Err(ApplicationError::InvalidOutput(
            "No books were added, something went wrong".to_string(),
        ));
    }

    Ok(AddBookResponse { ids, merged })
}

// ============================================================================
// UpdateBook
// ============================================================================

/// UpdateBook Handler - 更新后返回最新的书籍数据
pub struct UpdateBookHandler {
    calibre: Arc<CalibreService>,
}

impl UpdateBookHandler {
    pub fn new(calibre: Arc<CalibreService>) -> Self {
        Self { calibre }
    }

    pub async fn handle(&self, command: UpdateBook) -> Result<Book, ApplicationError> {
        let id = command.id;

        if with_update_fields(Vec::new(), &command.record).is_empty() {
            return Err(ApplicationError::validation("No valid fields to update"));
        }

        if fetch_book(&self.calibre, id).await?.is_none() {
            return Err(ApplicationError::not_found("book", id.value()));
        }

        // set_metadata 不报告字段级错误，以重新读取的数据为准
        self.calibre.update_book(id, &command.record).await?;

        tracing::info!(book_id = %id, fields = command.record.len(), "Book updated");

        fetch_book(&self.calibre, id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("book", id.value()))
    }
}

// ============================================================================
// RemoveBooks
// ============================================================================

/// RemoveBooks Handler - 删除后逐个确认
pub struct RemoveBooksHandler {
    calibre: Arc<CalibreService>,
}

impl RemoveBooksHandler {
    pub fn new(calibre: Arc<CalibreService>) -> Self {
        Self { calibre }
    }

    pub async fn handle(&self, command: RemoveBooks) -> Result<(), ApplicationError> {
        if command.ids.is_empty() {
            return Err(ApplicationError::validation("No book ids provided"));
        }

        // 不存在的 ID 会被 calibredb 静默忽略
        self.calibre
            .remove_books(&command.ids, command.permanent)
            .await?;

        for id in &command.ids {
            if fetch_book(&self.calibre, *id).await?.is_some() {
                return Err(ApplicationError::internal(format!(
                    "book {} was not deleted",
                    id
                )));
            }
        }

        tracing::info!(ids = ?command.ids, permanent = command.permanent, "Books removed");
        Ok(())
    }
}
