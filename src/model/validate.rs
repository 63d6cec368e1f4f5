//! 只读校验：与校对相同的遍历规则，但不修改目标树，收集全部问题后统一报告

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::tree::{is_ignored_key, is_placeholder, KeyPath, TranslationNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    MissingTranslation,
    UnresolvedPlaceholder,
    StructuralMismatch,
    UnexpectedKey,
    UnexpectedIcon,
    /// 基准文件文本不是规范排序形式
    NotSorted,
}

impl FindingKind {
    pub fn label(self) -> &'static str {
        match self {
            FindingKind::MissingTranslation => "缺失翻译",
            FindingKind::UnresolvedPlaceholder => "未处理的占位翻译",
            FindingKind::StructuralMismatch => "结构不匹配",
            FindingKind::UnexpectedKey => "多余的键",
            FindingKind::UnexpectedIcon => "多余的图标键",
            FindingKind::NotSorted => "未排序",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub path: KeyPath,
    pub kind: FindingKind,
}

impl Finding {
    pub fn new(path: KeyPath, kind: FindingKind) -> Self {
        Self { path, kind }
    }
}

type Children = BTreeMap<String, TranslationNode>;

/// 检查目标树与基准树是否结构一致且全部已翻译
pub fn validate(canonical: &TranslationNode, peer: &TranslationNode) -> Vec<Finding> {
    let mut out = Vec::new();
    match (canonical.children(), peer.children()) {
        (Some(base), Some(target)) => {
            find_missing(base, target, KeyPath::root(), &mut out);
            find_unexpected(base, target, KeyPath::root(), &mut out);
        }
        _ => out.push(Finding::new(KeyPath::root(), FindingKind::StructuralMismatch)),
    }
    out
}

fn find_missing(base: &Children, target: &Children, path: KeyPath, out: &mut Vec<Finding>) {
    for (key, value) in base {
        if is_ignored_key(key) {
            continue;
        }
        let child_path = path.child(key);

        let kind = match (value, target.get(key)) {
            (TranslationNode::Leaf(_), Some(TranslationNode::Leaf(text))) if is_placeholder(text) => {
                Some(FindingKind::UnresolvedPlaceholder)
            }
            (TranslationNode::Leaf(_), Some(TranslationNode::Leaf(_))) => None,
            (TranslationNode::Leaf(_), _) => Some(FindingKind::MissingTranslation),
            (TranslationNode::Container(_), None) => Some(FindingKind::MissingTranslation),
            (TranslationNode::Container(base_children), Some(TranslationNode::Container(children))) => {
                find_missing(base_children, children, child_path, out);
                None
            }
            (TranslationNode::Container(_), Some(_)) => Some(FindingKind::StructuralMismatch),
            (TranslationNode::Foreign(_), _) => Some(FindingKind::StructuralMismatch),
        };

        if let Some(kind) = kind {
            out.push(Finding::new(path.child(key), kind));
        }
    }
}

fn find_unexpected(base: &Children, target: &Children, path: KeyPath, out: &mut Vec<Finding>) {
    for (key, value) in target {
        let child_path = path.child(key);
        if is_ignored_key(key) {
            out.push(Finding::new(child_path, FindingKind::UnexpectedIcon));
            continue;
        }
        match (base.get(key), value) {
            (None, _) => out.push(Finding::new(child_path, FindingKind::UnexpectedKey)),
            (Some(TranslationNode::Container(base_children)), TranslationNode::Container(children)) => {
                find_unexpected(base_children, children, child_path, out);
            }
            _ => {}
        }
    }
}
