//! 翻译校验（只读）：供自动化测试使用，发现问题时以非零退出

use std::path::PathBuf;

use serde_json::{json, Value};

use crate::config::LocaleArgs;
use crate::model::error::CheckError;
use crate::model::sorter::is_canonical;
use crate::model::tree::KeyPath;
use crate::model::validate::{validate, Finding, FindingKind};

#[derive(Debug)]
pub struct LanguageReport {
    pub language: String,
    pub path: PathBuf,
    pub findings: Vec<Finding>,
    /// 文件无法加载时的错误；此时 findings 为空
    pub error: Option<CheckError>,
}

impl LanguageReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.error.is_none()
    }
}

#[derive(Debug)]
pub struct ValidateSummary {
    pub base_language: String,
    /// 第一项为基准语言（只检查排序），其后为各目标语言
    pub languages: Vec<LanguageReport>,
}

impl ValidateSummary {
    pub fn problem_count(&self) -> usize {
        self.languages
            .iter()
            .map(|l| l.findings.len() + usize::from(l.error.is_some()))
            .sum()
    }

    pub fn exit_code(&self) -> u8 {
        if self.problem_count() == 0 {
            0
        } else {
            1
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for lang in &self.languages {
            if let Some(e) = &lang.error {
                out.push_str(&format!("[!!] {}: {}\n", lang.language, e));
            }
            for finding in &lang.findings {
                out.push_str(&format!("[!!] {}: {}: {}\n", lang.language, finding.kind.label(), finding.path));
            }
        }
        match self.problem_count() {
            0 => out.push_str("校验通过\n"),
            n => out.push_str(&format!("校验失败: {n} 个问题\n")),
        }
        out
    }

    pub fn to_json(&self) -> Value {
        let languages: Vec<Value> = self
            .languages
            .iter()
            .map(|l| {
                json!({
                    "language": l.language,
                    "path": l.path.display().to_string(),
                    "findings": l.findings,
                    "error": l.error.as_ref().map(|e| e.to_string()),
                })
            })
            .collect();
        json!({
            "base_language": self.base_language,
            "problems": self.problem_count(),
            "languages": languages,
        })
    }
}

/// 运行校验。基准文件无法加载时直接返回错误。
pub fn run_validate(locales: &LocaleArgs) -> Result<ValidateSummary, CheckError> {
    let store = locales.open_store()?;
    let peers = store.peers_of(&locales.base_language)?;

    tracing::info!("校验排序: {}", locales.base_language);
    let (file, canonical) = store.load_canonical(&locales.base_language)?;
    let mut base_findings = Vec::new();
    if !is_canonical(&file.text, &file.value)? {
        base_findings.push(Finding::new(KeyPath::root(), FindingKind::NotSorted));
    }

    let mut languages = vec![LanguageReport {
        language: locales.base_language.clone(),
        path: file.path,
        findings: base_findings,
        error: None,
    }];

    tracing::info!("校验翻译: {} 个语言", peers.len());
    for language in peers {
        tracing::info!("  处理 {}", language);
        let path = store.path_for(&language);
        let report = match store.load_peer(&language) {
            Ok((_, peer)) => LanguageReport {
                findings: validate(&canonical, &peer),
                language,
                path,
                error: None,
            },
            Err(e) => {
                tracing::error!("{} 加载失败: {}", language, e);
                LanguageReport { language, path, findings: Vec::new(), error: Some(e) }
            }
        };
        languages.push(report);
    }

    Ok(ValidateSummary { base_language: locales.base_language.clone(), languages })
}
