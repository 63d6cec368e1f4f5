//! 翻译树：基准语言与各目标语言共用的强类型节点（叶子 / 容器）

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::model::error::CheckError;

/// 未翻译占位前缀
pub const PLACEHOLDER_MARKER: &str = "TRANSLATE: ";

/// 元数据键，不参与结构比对
pub const IGNORED_KEYS: [&str; 2] = ["icon", "icons"];

pub fn is_ignored_key(key: &str) -> bool {
    IGNORED_KEYS.contains(&key)
}

/// 为基准文本生成占位值
pub fn placeholder_for(text: &str) -> String {
    format!("{PLACEHOLDER_MARKER}{text}")
}

/// 只看前缀，不关心后半部分是否仍与基准文本一致
pub fn is_placeholder(value: &str) -> bool {
    value.starts_with(PLACEHOLDER_MARKER.trim_end())
}

/// 节点类型（用于错误信息与报告）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Leaf,
    Container,
    Foreign,
}

impl NodeKind {
    pub fn describe(self) -> &'static str {
        match self {
            NodeKind::Leaf => "字符串",
            NodeKind::Container => "对象",
            NodeKind::Foreign => "非字符串值",
        }
    }
}

/// 从点分路径的根开始累积的键序列，按值传入每一层递归
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, key: &str) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(key.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.0.join("."))
    }
}

impl Serialize for KeyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| s.as_ref().to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranslationNode {
    /// 可翻译文本，或带占位前缀的未翻译文本
    Leaf(String),
    /// 子节点；BTreeMap 保证按字节序遍历
    Container(BTreeMap<String, TranslationNode>),
    /// 仅出现在宽松加载的目标语言树中：数字、布尔、null、数组。
    /// 校对之后不会残留，序列化时视为格式错误。
    Foreign(Value),
}

fn describe_value(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "布尔值",
        Value::Number(_) => "数字",
        Value::String(_) => "字符串",
        Value::Array(_) => "数组",
        Value::Object(_) => "对象",
    }
}

impl TranslationNode {
    pub fn empty_container() -> Self {
        TranslationNode::Container(BTreeMap::new())
    }

    /// 严格加载基准语言树：根必须是对象，叶子必须是字符串
    pub fn from_canonical(value: Value) -> Result<Self, CheckError> {
        Self::from_root(value, true)
    }

    /// 宽松加载目标语言树：非字符串叶子保留为 Foreign，交给校对替换
    pub fn from_peer(value: Value) -> Result<Self, CheckError> {
        Self::from_root(value, false)
    }

    fn from_root(value: Value, strict: bool) -> Result<Self, CheckError> {
        if !value.is_object() {
            return Err(CheckError::StructuralMismatch {
                path: KeyPath::root().to_string(),
                expected: NodeKind::Container.describe(),
                found: describe_value(&value),
            });
        }
        Self::convert(value, KeyPath::root(), strict)
    }

    fn convert(value: Value, path: KeyPath, strict: bool) -> Result<Self, CheckError> {
        match value {
            Value::String(s) => Ok(TranslationNode::Leaf(s)),
            Value::Object(map) => {
                let mut children = BTreeMap::new();
                for (key, child) in map {
                    let node = Self::convert(child, path.child(&key), strict)?;
                    children.insert(key, node);
                }
                Ok(TranslationNode::Container(children))
            }
            other if strict => Err(CheckError::MalformedTree {
                path: path.to_string(),
                found: describe_value(&other),
            }),
            other => Ok(TranslationNode::Foreign(other)),
        }
    }

    /// 转回 JSON；遇到 Foreign 报格式错误
    pub fn to_value(&self) -> Result<Value, CheckError> {
        self.to_value_at(KeyPath::root())
    }

    fn to_value_at(&self, path: KeyPath) -> Result<Value, CheckError> {
        match self {
            TranslationNode::Leaf(s) => Ok(Value::String(s.clone())),
            TranslationNode::Container(children) => {
                let mut map = serde_json::Map::new();
                for (key, child) in children {
                    map.insert(key.clone(), child.to_value_at(path.child(key))?);
                }
                Ok(Value::Object(map))
            }
            TranslationNode::Foreign(v) => Err(CheckError::MalformedTree {
                path: path.to_string(),
                found: describe_value(v),
            }),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            TranslationNode::Leaf(_) => NodeKind::Leaf,
            TranslationNode::Container(_) => NodeKind::Container,
            TranslationNode::Foreign(_) => NodeKind::Foreign,
        }
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            TranslationNode::Leaf(s) => Some(s),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&BTreeMap<String, TranslationNode>> {
        match self {
            TranslationNode::Container(children) => Some(children),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&TranslationNode> {
        self.children().and_then(|c| c.get(key))
    }

    /// 按路径逐层查找
    pub fn at(&self, path: &KeyPath) -> Option<&TranslationNode> {
        path.segments()
            .iter()
            .try_fold(self, |node, key| node.get(key))
    }

    /// 枚举所有叶子路径（深度优先，按键序）
    pub fn leaf_paths(&self) -> Vec<KeyPath> {
        fn walk(out: &mut Vec<KeyPath>, node: &TranslationNode, path: KeyPath) {
            match node {
                TranslationNode::Container(children) => {
                    for (key, child) in children {
                        walk(out, child, path.child(key));
                    }
                }
                _ => out.push(path),
            }
        }

        let mut out = Vec::new();
        walk(&mut out, self, KeyPath::root());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_tree_from_nested_object() {
        let tree = TranslationNode::from_canonical(json!({
            "menu": { "open": "打开", "close": "关闭" },
            "title": "标题"
        }))
        .unwrap();

        assert_eq!(tree.kind(), NodeKind::Container);
        assert_eq!(tree.get("title").and_then(|n| n.as_leaf()), Some("标题"));

        let path: KeyPath = ["menu", "close"].into_iter().collect();
        assert_eq!(tree.at(&path).and_then(|n| n.as_leaf()), Some("关闭"));
    }

    #[test]
    fn test_canonical_rejects_non_string_leaf() {
        let err = TranslationNode::from_canonical(json!({
            "settings": { "enabled": true }
        }))
        .unwrap_err();

        match err {
            CheckError::MalformedTree { path, found } => {
                assert_eq!(path, "settings.enabled");
                assert_eq!(found, "布尔值");
            }
            other => panic!("意外的错误类型: {other:?}"),
        }
    }

    #[test]
    fn test_root_must_be_object() {
        let err = TranslationNode::from_peer(json!(["a", "b"])).unwrap_err();
        assert!(matches!(err, CheckError::StructuralMismatch { ref path, .. } if path == "<root>"));
    }

    #[test]
    fn test_peer_keeps_foreign_values_until_serialized() {
        let tree = TranslationNode::from_peer(json!({ "count": 3, "name": "x" })).unwrap();
        assert_eq!(tree.get("count").map(|n| n.kind()), Some(NodeKind::Foreign));

        let err = tree.to_value().unwrap_err();
        assert!(matches!(err, CheckError::MalformedTree { ref path, .. } if path == "count"));
    }

    #[test]
    fn test_leaf_paths_are_sorted_and_dotted() {
        let tree = TranslationNode::from_canonical(json!({
            "b": "2",
            "a": { "y": "1", "x": "0" }
        }))
        .unwrap();

        let paths: Vec<String> = tree.leaf_paths().iter().map(|p| p.to_string()).collect();
        assert_eq!(paths, vec!["a.x", "a.y", "b"]);
    }

    #[test]
    fn test_placeholder_helpers() {
        assert_eq!(placeholder_for("Hello"), "TRANSLATE: Hello");
        assert!(is_placeholder("TRANSLATE: Hello"));
        assert!(is_placeholder("TRANSLATE:Hello"));
        assert!(!is_placeholder("Bonjour"));
        assert!(is_ignored_key("icon"));
        assert!(is_ignored_key("icons"));
        assert!(!is_ignored_key("iconic"));
    }
}
