//! Export - 导出文件的下载响应
//!
//! 单个文件直接作为附件返回，多个文件打包成 `exports.zip`。

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use tempfile::TempDir;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use super::error::ApiError;

/// 多文件导出的压缩包文件名
pub const ARCHIVE_NAME: &str = "exports.zip";

/// 创建请求级导出目录，drop 时连同导出文件一起删除
pub fn export_dir() -> Result<TempDir, ApiError> {
    tempfile::Builder::new()
        .prefix("calibre-rest-export-")
        .tempdir()
        .map_err(|e| ApiError::Internal(format!("Failed to create export directory: {}", e)))
}

/// 将导出的文件转换为下载响应
pub async fn download(files: Vec<PathBuf>) -> Result<Response, ApiError> {
    if files.len() == 1 {
        let path = &files[0];
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to read exported file: {}", e)))?;
        return attachment(bytes, "application/octet-stream", &file_name(path));
    }

    let bytes = tokio::task::spawn_blocking(move || zip_files(&files))
        .await
        .map_err(|e| ApiError::Internal(format!("Archive task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Failed to create archive: {}", e)))?;

    tracing::debug!(size = bytes.len(), "Created export archive");
    attachment(bytes, "application/zip", ARCHIVE_NAME)
}

fn attachment(bytes: Vec<u8>, content_type: &'static str, name: &str) -> Result<Response, ApiError> {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        header_safe(name)
    ))
    .map_err(|e| ApiError::Internal(format!("Invalid export file name: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(bytes),
    )
        .into_response())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string())
}

/// 引号、反斜杠和非 ASCII 字符替换为 `_`
fn header_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn zip_files(files: &[PathBuf]) -> zip::result::ZipResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for path in files {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(file_name(path), options)?;
        writer.write_all(&std::fs::read(path)?)?;
    }

    Ok(writer.finish()?.into_inner())
}
