//! 语言文件存储：`<root>/<语言>/<文件名>`

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::model::error::CheckError;
use crate::model::tree::TranslationNode;
use crate::utils::fs::read_json_file;

pub const DEFAULT_FILE_NAME: &str = "translation.json";

/// 已加载的语言文件：原始文本、JSON值与路径
#[derive(Debug)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub text: String,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct LocaleStore {
    root: PathBuf,
    file_name: String,
}

impl LocaleStore {
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Result<Self, CheckError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CheckError::Config(format!("路径 \"{}\" 不存在", root.display())));
        }
        Ok(Self { root, file_name: file_name.into() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, language: &str) -> PathBuf {
        self.root.join(language).join(&self.file_name)
    }

    /// 根目录下所有子目录名（按字节序），普通文件忽略
    pub fn languages(&self) -> Result<Vec<String>, CheckError> {
        let entries = fs::read_dir(&self.root).map_err(|e| CheckError::io(&self.root, e))?;
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CheckError::io(&self.root, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| CheckError::io(entry.path(), e))?
                .is_dir();
            if !is_dir {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => out.push(name),
                Err(raw) => tracing::warn!("跳过非UTF-8目录名: {:?}", raw),
            }
        }
        out.sort();
        Ok(out)
    }

    /// 除基准语言以外的全部语言；基准语言必须存在
    pub fn peers_of(&self, base: &str) -> Result<Vec<String>, CheckError> {
        let mut all = self.languages()?;
        let Some(pos) = all.iter().position(|l| l == base) else {
            return Err(CheckError::Config(format!("找不到语言 \"{base}\"")));
        };
        all.remove(pos);
        Ok(all)
    }

    pub fn load(&self, language: &str) -> Result<LoadedFile, CheckError> {
        let path = self.path_for(language);
        let (text, value) = read_json_file(&path)?;
        tracing::debug!("已加载 {}: {} 字节", path.display(), text.len());
        Ok(LoadedFile { path, text, value })
    }

    /// 严格加载基准语言树
    pub fn load_canonical(&self, language: &str) -> Result<(LoadedFile, TranslationNode), CheckError> {
        let file = self.load(language)?;
        let tree = TranslationNode::from_canonical(file.value.clone())?;
        Ok((file, tree))
    }

    /// 宽松加载目标语言树
    pub fn load_peer(&self, language: &str) -> Result<(LoadedFile, TranslationNode), CheckError> {
        let file = self.load(language)?;
        let tree = TranslationNode::from_peer(file.value.clone())?;
        Ok((file, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_language(root: &Path, lang: &str, content: &str) {
        let dir = root.join(lang);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DEFAULT_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_languages_are_sorted_directories() {
        let dir = tempdir().expect("创建临时目录失败");
        write_language(dir.path(), "nl", "{}");
        write_language(dir.path(), "de", "{}");
        write_language(dir.path(), "en", "{}");
        fs::write(dir.path().join("README.md"), "not a language").unwrap();

        let store = LocaleStore::new(dir.path(), DEFAULT_FILE_NAME).unwrap();
        assert_eq!(store.languages().unwrap(), vec!["de", "en", "nl"]);
        assert_eq!(store.peers_of("en").unwrap(), vec!["de", "nl"]);
    }

    #[test]
    fn test_unknown_base_language() {
        let dir = tempdir().expect("创建临时目录失败");
        write_language(dir.path(), "en", "{}");

        let store = LocaleStore::new(dir.path(), DEFAULT_FILE_NAME).unwrap();
        assert!(matches!(store.peers_of("fr"), Err(CheckError::Config(_))));
    }

    #[test]
    fn test_missing_root() {
        let dir = tempdir().expect("创建临时目录失败");
        let result = LocaleStore::new(dir.path().join("nope"), DEFAULT_FILE_NAME);
        assert!(matches!(result, Err(CheckError::Config(_))));
    }

    #[test]
    fn test_canonical_strict_peer_lenient() {
        let dir = tempdir().expect("创建临时目录失败");
        write_language(dir.path(), "en", r#"{"a": 1}"#);
        write_language(dir.path(), "de", r#"{"a": 1}"#);

        let store = LocaleStore::new(dir.path(), DEFAULT_FILE_NAME).unwrap();
        assert!(matches!(store.load_canonical("en"), Err(CheckError::MalformedTree { .. })));
        assert!(store.load_peer("de").is_ok());
    }
}
