//! 校对：以基准语言树为模板，补全（extend）并裁剪（shrink）目标语言树
//!
//! 两遍顺序固定：先补全缺失的键与容器，再删除基准中不存在的键。
//! 基准树只读；目标树按值传入，只有整个流程成功才返回，调用方据此决定是否写回。

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::error::CheckError;
use crate::model::tree::{is_ignored_key, is_placeholder, placeholder_for, KeyPath, NodeKind, TranslationNode};

type Children = BTreeMap<String, TranslationNode>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    AddedKey,
    AddedLeaf,
    ResetContainer,
    RefreshedPlaceholder,
    RemovedIcon,
    RemovedOrphanKey,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::AddedKey => "新增键",
            ChangeKind::AddedLeaf => "新增翻译",
            ChangeKind::ResetContainer => "重置键",
            ChangeKind::RefreshedPlaceholder => "刷新占位",
            ChangeKind::RemovedIcon => "移除图标",
            ChangeKind::RemovedOrphanKey => "移除多余键",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub path: KeyPath,
    pub kind: ChangeKind,
}

/// 一次校对对目标树做的全部改动，按发生顺序排列
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationReport {
    pub changes: Vec<Change>,
}

impl ReconciliationReport {
    fn record(&mut self, path: KeyPath, kind: ChangeKind) {
        self.changes.push(Change { path, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// 用当前基准文本重写已有占位值；默认保留旧占位
    pub refresh_placeholders: bool,
}

fn mismatch(path: &KeyPath, expected: &'static str, found: NodeKind) -> CheckError {
    CheckError::StructuralMismatch {
        path: path.to_string(),
        expected,
        found: found.describe(),
    }
}

/// 校对单个目标语言树
pub fn reconcile(
    canonical: &TranslationNode,
    mut peer: TranslationNode,
    options: &ReconcileOptions,
) -> Result<(TranslationNode, ReconciliationReport), CheckError> {
    let root = KeyPath::root();
    let base = canonical
        .children()
        .ok_or_else(|| mismatch(&root, NodeKind::Container.describe(), canonical.kind()))?;

    let peer_kind = peer.kind();
    let TranslationNode::Container(target) = &mut peer else {
        return Err(mismatch(&root, NodeKind::Container.describe(), peer_kind));
    };

    let mut report = ReconciliationReport::default();
    extend(base, target, root.clone(), options, &mut report)?;
    shrink(base, target, root, &mut report);

    tracing::debug!(
        "校对完成: 新增 {}，重置 {}，移除 {}",
        report.count(ChangeKind::AddedLeaf) + report.count(ChangeKind::AddedKey),
        report.count(ChangeKind::ResetContainer),
        report.count(ChangeKind::RemovedOrphanKey) + report.count(ChangeKind::RemovedIcon),
    );
    Ok((peer, report))
}

fn extend(
    base: &Children,
    target: &mut Children,
    path: KeyPath,
    options: &ReconcileOptions,
    report: &mut ReconciliationReport,
) -> Result<(), CheckError> {
    for (key, value) in base {
        if is_ignored_key(key) {
            continue;
        }
        let child_path = path.child(key);

        match value {
            TranslationNode::Leaf(text) => {
                let fresh = placeholder_for(text);
                let action = match target.get(key) {
                    Some(TranslationNode::Leaf(existing)) if is_placeholder(existing) => {
                        (options.refresh_placeholders && *existing != fresh)
                            .then_some(ChangeKind::RefreshedPlaceholder)
                    }
                    Some(TranslationNode::Leaf(_)) => None,
                    _ => Some(ChangeKind::AddedLeaf),
                };
                if let Some(kind) = action {
                    target.insert(key.clone(), TranslationNode::Leaf(fresh));
                    report.record(child_path, kind);
                }
            }
            TranslationNode::Container(base_children) => {
                let slot = target.entry(key.clone()).or_insert_with(|| {
                    report.record(child_path.clone(), ChangeKind::AddedKey);
                    TranslationNode::empty_container()
                });
                if !matches!(slot, TranslationNode::Container(_)) {
                    *slot = TranslationNode::empty_container();
                    report.record(child_path.clone(), ChangeKind::ResetContainer);
                }
                if let TranslationNode::Container(target_children) = slot {
                    extend(base_children, target_children, child_path, options, report)?;
                }
            }
            TranslationNode::Foreign(_) => {
                return Err(mismatch(&child_path, "字符串或对象", value.kind()));
            }
        }
    }
    Ok(())
}

/// 空出来的容器保留；只删除基准里不存在的键
fn shrink(base: &Children, target: &mut Children, path: KeyPath, report: &mut ReconciliationReport) {
    target.retain(|key, node| {
        let child_path = path.child(key);
        if is_ignored_key(key) {
            report.record(child_path, ChangeKind::RemovedIcon);
            return false;
        }
        match (base.get(key), node) {
            (None, _) => {
                report.record(child_path, ChangeKind::RemovedOrphanKey);
                false
            }
            (Some(TranslationNode::Container(base_children)), TranslationNode::Container(children)) => {
                shrink(base_children, children, child_path, report);
                true
            }
            _ => true,
        }
    });
}
