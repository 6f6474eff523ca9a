//! Calibre Service - 命令翻译与执行核心的对外边界
//!
//! 调用方传入领域对象，得到 calibredb 的原始文本输出或类型化错误。
//! 输出的进一步解析（JSON、ID 列表）由命令/查询处理器完成。

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::book::{Automerge, BookId, BookRecord};
use crate::domain::command::{AddSource, CommandBuilder};

use super::error::CalibreError;
use super::executor::CalibreExecutor;
use super::interpreter::CommandOutput;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"calibre ([\d.]+)").expect("valid version regex"));

/// calibredb 服务
pub struct CalibreService {
    commands: CommandBuilder,
    executor: CalibreExecutor,
}

impl CalibreService {
    pub fn new(commands: CommandBuilder, executor: CalibreExecutor) -> Self {
        Self { commands, executor }
    }

    /// 启动时健康检查：确认 calibredb 可以运行
    pub async fn verify(&self) -> Result<String, CalibreError> {
        let version = self.version().await?;
        match &version {
            Some(v) => tracing::info!(version = %v, "calibredb is runnable"),
            None => tracing::warn!("calibredb is runnable but its version could not be parsed"),
        }
        Ok(version.unwrap_or_else(|| "unknown".to_string()))
    }

    /// calibredb 版本号，无法解析时为 `None`
    pub async fn version(&self) -> Result<Option<String>, CalibreError> {
        let output = self.executor.execute(&self.commands.version()).await?;
        Ok(parse_version(&output.stdout))
    }

    /// 列出书籍（排序 + 搜索）
    pub async fn list_books(
        &self,
        sort: &[String],
        search: &[String],
        limit: Option<u32>,
    ) -> Result<CommandOutput, CalibreError> {
        self.executor
            .execute(&self.commands.list(sort, search, limit))
            .await
    }

    /// 按 ID 查询单本书（`list --search=id:<id> --limit=1`）
    pub async fn get_book(&self, id: BookId) -> Result<CommandOutput, CalibreError> {
        self.executor.execute(&self.commands.get(id)).await
    }

    /// 添加书籍
    pub async fn add_book(
        &self,
        source: &AddSource,
        record: &BookRecord,
        automerge: Automerge,
    ) -> Result<CommandOutput, CalibreError> {
        self.executor
            .execute(&self.commands.add(source, record, automerge))
            .await
    }

    /// 更新书籍元数据
    pub async fn update_book(&self, id: BookId, record: &BookRecord) -> Result<CommandOutput, CalibreError> {
        self.executor.execute(&self.commands.update(id, record)).await
    }

    /// 删除书籍
    pub async fn remove_books(&self, ids: &[BookId], permanent: bool) -> Result<CommandOutput, CalibreError> {
        self.executor
            .execute(&self.commands.remove(ids, permanent))
            .await
    }

    /// 导出书籍文件到 `to_dir`
    pub async fn export_books(
        &self,
        ids: &[BookId],
        to_dir: &Path,
        formats: &[String],
    ) -> Result<CommandOutput, CalibreError> {
        self.executor
            .execute(&self.commands.export(ids, to_dir, formats))
            .await
    }
}

pub(crate) fn parse_version(stdout: &str) -> Option<String> {
    VERSION_RE
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
