//! 错误类型：加载、校对、序列化过程中的所有失败

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO失败: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON解析失败: {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// 叶子不是字符串（数字、布尔、null、数组）
    #[error("翻译树格式错误: {path} 处为 {found}，叶子必须是字符串")]
    MalformedTree { path: String, found: &'static str },
    /// 同一路径上基准与目标的节点类型不一致
    #[error("结构不匹配: {path} 处期望 {expected}，实际为 {found}")]
    StructuralMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("JSON序列化失败: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("配置错误: {0}")]
    Config(String),
}

impl CheckError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse { path: path.into(), source }
    }
}
