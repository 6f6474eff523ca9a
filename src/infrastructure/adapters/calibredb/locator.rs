//! Calibre Locator - 启动时定位 calibredb 和书库

use std::path::{Path, PathBuf};

use crate::application::calibre::CalibreError;
use crate::domain::command::LibraryLocation;

/// 定位 calibredb 可执行文件
///
/// 既可以是路径，也可以是 PATH 中的命令名。
pub fn locate_calibredb(program: &str) -> Result<PathBuf, CalibreError> {
    which::which(program).map_err(|e| {
        CalibreError::NotFound(format!(
            "Executable could not be found.\n\n{}: {}",
            program, e
        ))
    })
}

/// 检查本地书库是否存在；远程书库由 calibredb 在运行时校验
pub fn check_library(library: &LibraryLocation) -> Result<(), CalibreError> {
    match library {
        LibraryLocation::Remote(url) => {
            tracing::debug!(library = %url, "Remote library, skipping local check");
            Ok(())
        }
        LibraryLocation::Local(path) => check_local_library(path),
    }
}

fn check_local_library(path: &Path) -> Result<(), CalibreError> {
    if !path.is_dir() {
        return Err(CalibreError::NotFound(format!(
            "Library {} does not exist",
            path.display()
        )));
    }
    if !path.join("metadata.db").is_file() {
        return Err(CalibreError::NotFound(format!(
            "Library {} does not contain metadata.db",
            path.display()
        )));
    }
    Ok(())
}
