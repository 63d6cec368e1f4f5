//! IO helper: safe file read/write for JSON

use std::{fs, io::Write, path::Path};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::model::error::CheckError;

/// 读取文件全文（UTF-8）
pub fn read_text(p: &Path) -> Result<String, CheckError> {
    fs::read_to_string(p).map_err(|e| CheckError::io(p, e))
}

/// 从文件读取JSON数据，同时返回原始文本
pub fn read_json_file(p: &Path) -> Result<(String, Value), CheckError> {
    let text = read_text(p)?;
    let v: Value = serde_json::from_str(&text).map_err(|e| CheckError::parse(p, e))?;
    Ok((text, v))
}

/// 内容不同才写回，避免无意义地更新修改时间。
/// 先写同目录临时文件再 rename，失败时原文件保持不变。
/// 已有文件的权限会沿用到新文件上。
/// 返回是否真的写了文件。
pub fn write_if_changed(p: &Path, contents: &str) -> Result<bool, CheckError> {
    let permissions = match fs::read(p) {
        Ok(existing) if existing == contents.as_bytes() => return Ok(false),
        Ok(_) => Some(fs::metadata(p).map_err(|e| CheckError::io(p, e))?.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(CheckError::io(p, e)),
    };

    let dir = p
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CheckError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| CheckError::io(tmp.path(), e))?;
    // NamedTempFile 默认 0600
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| CheckError::io(tmp.path(), e))?;
    }
    tmp.persist(p).map_err(|e| CheckError::io(p, e.error))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_if_changed_skips_identical_content() {
        let dir = tempdir().expect("创建临时目录失败");
        let path = dir.path().join("translation.json");

        assert!(write_if_changed(&path, "{}\n").unwrap(), "首次写入应该发生");
        assert!(!write_if_changed(&path, "{}\n").unwrap(), "相同内容不应重写");
        assert!(write_if_changed(&path, "{\n    \"a\": \"b\"\n}\n").unwrap());
        assert_eq!(read_text(&path).unwrap(), "{\n    \"a\": \"b\"\n}\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("创建临时目录失败");
        let path = dir.path().join("translation.json");
        fs::write(&path, "{}\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(write_if_changed(&path, "{\n    \"a\": \"b\"\n}\n").unwrap());

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644, "重写后文件权限应保持不变");
    }

    #[test]
    fn test_read_json_file_reports_path_on_parse_error() {
        let dir = tempdir().expect("创建临时目录失败");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"invalid\": json content}").unwrap();

        let err = read_json_file(&path).unwrap_err();
        assert!(matches!(err, CheckError::Parse { path: ref p, .. } if p == &path));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempdir().expect("创建临时目录失败");
        let err = read_text(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CheckError::Io { .. }));
    }
}
