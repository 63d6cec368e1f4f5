//! 规范化序列化：键按字节序排序、4空格缩进、非ASCII原样保留、末尾换行

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::model::error::CheckError;
use crate::model::tree::TranslationNode;

const INDENT: &[u8] = b"    ";

/// 序列化时逐层排序，不依赖 serde_json::Map 的内部顺序
struct Sorted<'a>(&'a Value);

impl Serialize for Sorted<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    out.serialize_entry(key, &Sorted(value))?;
                }
                out.end()
            }
            Value::Array(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(&Sorted(item))?;
                }
                out.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}

/// 任意 JSON 的规范文本
pub fn sort_value(value: &Value) -> Result<String, CheckError> {
    let mut buf = Vec::with_capacity(4096);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    Sorted(value)
        .serialize(&mut ser)
        .map_err(CheckError::Serialize)?;
    buf.push(b'\n');
    // serde_json 只输出合法 UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// 翻译树的规范文本；树中残留非字符串值时报格式错误
pub fn sort_tree(tree: &TranslationNode) -> Result<String, CheckError> {
    sort_value(&tree.to_value()?)
}

/// 原始文本是否已是规范形式（忽略首尾空白）
pub fn is_canonical(original: &str, value: &Value) -> Result<bool, CheckError> {
    Ok(sort_value(value)?.trim() == original.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_sorted_with_four_space_indent() {
        let value = json!({
            "b": "2",
            "a": { "y": "ü", "x": "0" }
        });

        let text = sort_value(&value).unwrap();
        let expected = "{\n    \"a\": {\n        \"x\": \"0\",\n        \"y\": \"ü\"\n    },\n    \"b\": \"2\"\n}\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_byte_order_not_locale_order() {
        let value = json!({ "b": "1", "B": "2", "ä": "3", "a": "4" });
        let text = sort_value(&value).unwrap();

        let keys: Vec<&str> = text
            .lines()
            .filter_map(|l| l.trim().strip_prefix('"'))
            .filter_map(|l| l.split('"').next())
            .collect();
        assert_eq!(keys, vec!["B", "a", "b", "ä"]);
    }

    #[test]
    fn test_non_ascii_kept_and_control_chars_escaped() {
        let value = json!({ "greeting": "你好\n\"世界\"" });
        let text = sort_value(&value).unwrap();
        assert!(text.contains("你好\\n\\\"世界\\\""), "实际输出: {text}");
        assert!(!text.contains("\\u4f60"));
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(sort_value(&json!({})).unwrap(), "{}\n");
        assert_eq!(sort_value(&json!({ "a": {} })).unwrap(), "{\n    \"a\": {}\n}\n");
    }

    #[test]
    fn test_sorting_is_idempotent() {
        let shapes = [
            json!({
                "zeta": { "b": "β", "a": "α", "nested": { "z": "1", "m": "2" } },
                "alpha": "A",
                "icons": { "x": "y" }
            }),
            json!({}),
            json!({ "a": {}, "b": { "c": {} } }),
            json!({ "l1": { "l2": { "l3": { "l4": { "l5": { "l6": "深" } } } } } }),
            json!({ "ctrl": "\u{1}\t\n\"\\", "del": "\u{7f}" }),
            json!({ "a": "1", "A": "2", "ä": "3", "Ä": "4", "b": "5", "日本": "6" }),
            json!({ "list": [3, "x", null, true, { "b": 1, "a": 2 }], "n": 1.5 }),
        ];

        for value in shapes {
            let once = sort_value(&value).unwrap();
            let reparsed: Value = serde_json::from_str(&once).unwrap();
            assert_eq!(reparsed, value, "排序不应改变内容: {once}");
            let twice = sort_value(&reparsed).unwrap();
            assert_eq!(once, twice, "再次排序结果应一致: {once}");
            assert!(is_canonical(&once, &reparsed).unwrap());
        }
    }

    #[test]
    fn test_unsorted_text_is_not_canonical() {
        let original = "{\"b\": \"1\", \"a\": \"2\"}";
        let value: Value = serde_json::from_str(original).unwrap();
        assert!(!is_canonical(original, &value).unwrap());
    }

    #[test]
    fn test_sort_tree_rejects_foreign_leaf() {
        let tree = TranslationNode::from_peer(json!({ "a": { "n": null } })).unwrap();
        let err = sort_tree(&tree).unwrap_err();
        assert!(matches!(err, CheckError::MalformedTree { ref path, .. } if path == "a.n"));
    }
}
