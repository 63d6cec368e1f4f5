//! JSON 规范排序：把文件改写为规范形式，内容不变时不碰文件

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::model::error::CheckError;
use crate::model::sorter::{sort_tree, sort_value};
use crate::model::tree::TranslationNode;
use crate::utils::fs::{read_json_file, write_if_changed};

#[derive(Debug, Clone, Copy, Default)]
pub struct SortOptions {
    /// 只检查，不写文件
    pub check_only: bool,
    /// 接受任意 JSON；否则要求是翻译树（叶子均为字符串）
    pub any_json: bool,
}

#[derive(Debug)]
pub enum SortStatus {
    Unchanged,
    Rewritten,
    /// 仅在 check_only 模式下出现
    Unsorted,
    Failed(CheckError),
}

#[derive(Debug)]
pub struct SortResult {
    pub path: PathBuf,
    pub status: SortStatus,
}

#[derive(Debug)]
pub struct SortSummary {
    pub files: Vec<SortResult>,
}

impl SortSummary {
    pub fn exit_code(&self) -> u8 {
        let bad = self
            .files
            .iter()
            .any(|f| matches!(f.status, SortStatus::Unsorted | SortStatus::Failed(_)));
        u8::from(bad)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            let line = match &file.status {
                SortStatus::Unchanged => format!("已排序: {}", file.path.display()),
                SortStatus::Rewritten => format!("已重写: {}", file.path.display()),
                SortStatus::Unsorted => format!("[!!] 未排序: {}", file.path.display()),
                SortStatus::Failed(e) => format!("[!!] 处理失败: {e}"),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Value {
        let files: Vec<Value> = self
            .files
            .iter()
            .map(|f| {
                let (status, error) = match &f.status {
                    SortStatus::Unchanged => ("unchanged", None),
                    SortStatus::Rewritten => ("rewritten", None),
                    SortStatus::Unsorted => ("unsorted", None),
                    SortStatus::Failed(e) => ("failed", Some(e.to_string())),
                };
                json!({ "path": f.path.display().to_string(), "status": status, "error": error })
            })
            .collect();
        json!({ "files": files })
    }
}

/// 逐个文件处理，单个文件失败不影响其他文件
pub fn run_sort(files: &[PathBuf], options: &SortOptions) -> SortSummary {
    let files = files
        .iter()
        .map(|path| {
            let status = sort_file(path, options).unwrap_or_else(|e| {
                tracing::error!("{} 处理失败: {}", path.display(), e);
                SortStatus::Failed(e)
            });
            SortResult { path: path.clone(), status }
        })
        .collect();
    SortSummary { files }
}

pub fn sort_file(path: &Path, options: &SortOptions) -> Result<SortStatus, CheckError> {
    let (text, value) = read_json_file(path)?;
    let sorted = if options.any_json {
        sort_value(&value)?
    } else {
        sort_tree(&TranslationNode::from_canonical(value)?)?
    };

    if options.check_only {
        return Ok(if sorted.trim() == text.trim() { SortStatus::Unchanged } else { SortStatus::Unsorted });
    }
    if write_if_changed(path, &sorted)? {
        tracing::info!("已重写 {}", path.display());
        Ok(SortStatus::Rewritten)
    } else {
        Ok(SortStatus::Unchanged)
    }
}
