//! 翻译检查：逐个语言执行 补全 → 裁剪 → 规范化 → 写回
//!
//! 单个语言失败不影响其他语言；任何失败都不会写出半成品文件。

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde_json::{json, Value};

use crate::config::LocaleArgs;
use crate::model::error::CheckError;
use crate::model::reconcile::{reconcile, ReconcileOptions, ReconciliationReport};
use crate::model::sorter::sort_tree;
use crate::model::store::LocaleStore;
use crate::model::tree::TranslationNode;
use crate::utils::fs::write_if_changed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// 记录错误并继续处理下一个语言
    #[default]
    ContinueOnError,
    /// 出错后尚未开始的语言全部跳过
    AbortOnError,
}

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub reconcile: ReconcileOptions,
    pub policy: ErrorPolicy,
    /// 大于1时使用 rayon 线程池并行处理
    pub jobs: usize,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum PeerOutcome {
    /// `changed` 表示文件内容有变化（dry-run 时表示将会变化）
    Updated { report: ReconciliationReport, changed: bool },
    Failed(CheckError),
    Skipped,
}

#[derive(Debug)]
pub struct PeerResult {
    pub language: String,
    pub path: PathBuf,
    pub outcome: PeerOutcome,
}

#[derive(Debug)]
pub struct CheckSummary {
    pub base_language: String,
    pub dry_run: bool,
    pub peers: Vec<PeerResult>,
}

impl CheckSummary {
    pub fn failed(&self) -> usize {
        self.peers
            .iter()
            .filter(|p| matches!(p.outcome, PeerOutcome::Failed(_)))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.peers
            .iter()
            .filter(|p| matches!(p.outcome, PeerOutcome::Skipped))
            .count()
    }

    pub fn exit_code(&self) -> u8 {
        if self.failed() == 0 && self.skipped() == 0 {
            0
        } else {
            1
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for peer in &self.peers {
            out.push_str(&format!("处理: {}\n", peer.language));
            match &peer.outcome {
                PeerOutcome::Updated { report, changed } => {
                    for change in report.iter() {
                        out.push_str(&format!("  {}: {}\n", change.kind.label(), change.path));
                    }
                    let status = match (changed, self.dry_run) {
                        (false, _) => "无需改动",
                        (true, false) => "已写回",
                        (true, true) => "需要写回（未写入）",
                    };
                    out.push_str(&format!("  {status}: {}\n", peer.path.display()));
                }
                PeerOutcome::Failed(e) => out.push_str(&format!("  错误: {e}\n")),
                PeerOutcome::Skipped => out.push_str("  已跳过\n"),
            }
        }
        out.push_str(&format!(
            "完成: {} 个语言成功，{} 个失败，{} 个跳过\n",
            self.peers.len() - self.failed() - self.skipped(),
            self.failed(),
            self.skipped()
        ));
        out
    }

    pub fn to_json(&self) -> Value {
        let peers: Vec<Value> = self
            .peers
            .iter()
            .map(|peer| {
                let mut entry = json!({
                    "language": peer.language,
                    "path": peer.path.display().to_string(),
                });
                let detail = match &peer.outcome {
                    PeerOutcome::Updated { report, changed } => json!({
                        "status": "updated",
                        "changed": changed,
                        "changes": report.changes,
                    }),
                    PeerOutcome::Failed(e) => json!({ "status": "failed", "error": e.to_string() }),
                    PeerOutcome::Skipped => json!({ "status": "skipped" }),
                };
                if let (Value::Object(entry), Value::Object(detail)) = (&mut entry, detail) {
                    entry.extend(detail);
                }
                entry
            })
            .collect();

        json!({
            "base_language": self.base_language,
            "dry_run": self.dry_run,
            "failed": self.failed(),
            "skipped": self.skipped(),
            "peers": peers,
        })
    }
}

/// 运行翻译检查。基准文件无法加载时直接返回错误。
pub fn run_check(locales: &LocaleArgs, options: &CheckOptions) -> Result<CheckSummary, CheckError> {
    let store = locales.open_store()?;
    let peers = store.peers_of(&locales.base_language)?;
    let (file, canonical) = store.load_canonical(&locales.base_language)?;
    tracing::info!(
        "基准语言 {} ({} 条翻译)，待处理 {} 个语言",
        locales.base_language,
        canonical.leaf_paths().len(),
        peers.len()
    );
    tracing::debug!("基准文件: {}", file.path.display());

    let abort = AtomicBool::new(false);
    let process = |language: &String| -> PeerResult {
        let path = store.path_for(language);
        if abort.load(Ordering::SeqCst) {
            tracing::warn!("跳过 {}: 之前的语言处理失败", language);
            return PeerResult { language: language.clone(), path, outcome: PeerOutcome::Skipped };
        }

        let outcome = match process_peer(&store, &canonical, language, options) {
            Ok((report, changed)) => {
                tracing::info!("{}: {} 处改动，{}", language, report.len(), if changed { "已更新" } else { "未变化" });
                PeerOutcome::Updated { report, changed }
            }
            Err(e) => {
                tracing::error!("{} 处理失败: {}", language, e);
                if options.policy == ErrorPolicy::AbortOnError {
                    abort.store(true, Ordering::SeqCst);
                }
                PeerOutcome::Failed(e)
            }
        };
        PeerResult { language: language.clone(), path, outcome }
    };

    let results: Vec<PeerResult> = if options.jobs > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.jobs)
            .build()
            .map_err(|e| CheckError::Config(format!("无法创建线程池: {e}")))?;
        pool.install(|| peers.par_iter().map(&process).collect())
    } else {
        peers.iter().map(&process).collect()
    };

    Ok(CheckSummary {
        base_language: locales.base_language.clone(),
        dry_run: options.dry_run,
        peers: results,
    })
}

fn process_peer(
    store: &LocaleStore,
    canonical: &TranslationNode,
    language: &str,
    options: &CheckOptions,
) -> Result<(ReconciliationReport, bool), CheckError> {
    let (file, peer) = store.load_peer(language)?;
    let (updated, report) = reconcile(canonical, peer, &options.reconcile)?;
    let text = sort_tree(&updated)?;

    let changed = if options.dry_run {
        text != file.text
    } else {
        write_if_changed(&file.path, &text)?
    };
    Ok((report, changed))
}
