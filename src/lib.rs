//! 翻译文件校对工具库
//!
//! 以基准语言的翻译树为模板，补全并裁剪其他语言的翻译树，
//! 提供只读校验与规范化排序输出

pub mod config;
pub mod model;
pub mod tasks;
pub mod utils;

// 重新导出主要类型
pub use model::error::CheckError;
pub use model::reconcile::{reconcile, ChangeKind, ReconcileOptions, ReconciliationReport};
pub use model::sorter::{sort_tree, sort_value};
pub use model::tree::{KeyPath, NodeKind, TranslationNode};
pub use model::validate::{validate, Finding, FindingKind};
