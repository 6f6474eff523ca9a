//! Upload - 上传文件的校验与暂存
//!
//! 上传的书籍文件写入请求级临时目录，请求结束时随目录一起删除。

use std::path::{Path, PathBuf};

use axum::extract::multipart::MultipartError;
use tempfile::TempDir;

use super::error::ApiError;

/// calibre 可导入的书籍格式
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".azw", ".azw3", ".azw4", ".cbz", ".cbr", ".cb7", ".cbc", ".chm", ".djvu", ".docx", ".epub",
    ".fb2", ".fbz", ".html", ".htmlz", ".lit", ".lrf", ".mobi", ".odt", ".pdf", ".prc", ".pdb",
    ".pml", ".rb", ".rtf", ".snb", ".tcr", ".txt", ".txtz",
];

/// 清理上传文件名：去掉目录部分，非 `[A-Za-z0-9._-]` 字符替换为 `_`，去掉前导 `.`
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

/// 校验并清理上传文件名
///
/// 以 `-` 开头的文件名会被 calibredb 当作选项，直接拒绝。
pub fn validate_filename(raw: &str) -> Result<String, ApiError> {
    let name = sanitize_filename(raw);
    if name.is_empty() {
        return Err(ApiError::Unprocessable("Invalid file or filename".to_string()));
    }

    let lower = name.to_ascii_lowercase();
    let allowed = ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
    if name.starts_with('-') || !allowed {
        return Err(ApiError::Unprocessable(format!("Invalid filename ({})", raw)));
    }

    Ok(name)
}

/// 请求级上传目录
pub struct UploadDir {
    dir: TempDir,
    files: Vec<PathBuf>,
}

impl UploadDir {
    pub fn new() -> Result<Self, ApiError> {
        let dir = tempfile::Builder::new()
            .prefix("calibre-rest-")
            .tempdir()
            .map_err(|e| ApiError::Internal(format!("Failed to create upload directory: {}", e)))?;
        Ok(Self {
            dir,
            files: Vec::new(),
        })
    }

    /// 写入一个上传文件
    ///
    /// 每个文件放在独立子目录中，同名文件互不覆盖。
    pub async fn save(&mut self, raw_name: &str, bytes: &[u8]) -> Result<&Path, ApiError> {
        let name = validate_filename(raw_name)?;
        let slot = self.dir.path().join(self.files.len().to_string());

        tokio::fs::create_dir(&slot)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store upload: {}", e)))?;
        let path = slot.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store upload: {}", e)))?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored uploaded file");
        self.files.push(path);
        Ok(&self.files[self.files.len() - 1])
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// multipart 读取错误 → ApiError（超过请求体上限时为 413）
pub fn multipart_error(e: MultipartError) -> ApiError {
    let status = e.status();
    if status == http::StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e.body_text()))
    }
}
