//! 响应信封解析
//!
//! 目标 API 可能直接返回数组/对象，也可能把真正的数据包在某个字段里
//! （如 `{"data": [...]}` 或 `{"mensaje": "...", "datos": [...]}`）。
//! 这里把响应体解析成显式的形状枚举，由调用方逐个分支处理。

use serde_json::{Map, Value};

use crate::session::state::EntityId;

/// 列表响应的形状
#[derive(Debug, Clone, PartialEq)]
pub enum ListShape {
    /// 裸数组
    Array(Vec<Value>),
    /// 信封字段中的数组
    Enveloped(Vec<Value>),
    /// 无法识别（非 JSON、信封字段缺失或不是数组等）
    Unrecognized,
}

impl ListShape {
    /// 解析列表响应体
    pub fn parse(body: &[u8], envelope_key: &str) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Array(items)) => Self::Array(items),
            Ok(Value::Object(mut object)) => match object.remove(envelope_key) {
                Some(Value::Array(items)) => Self::Enveloped(items),
                _ => Self::Unrecognized,
            },
            _ => Self::Unrecognized,
        }
    }

    /// 按顺序提取条目中可解析的 ID
    ///
    /// 无法识别的形状返回 None，与“识别成功但没有条目”区分开。
    pub fn ids(&self) -> Option<Vec<EntityId>> {
        match self {
            Self::Array(items) | Self::Enveloped(items) => {
                Some(items.iter().filter_map(item_id).collect())
            }
            Self::Unrecognized => None,
        }
    }
}

/// 单对象响应的形状（创建接口）
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    Bare(Map<String, Value>),
    Enveloped(Map<String, Value>),
    Unrecognized,
}

impl ObjectShape {
    /// 解析单对象响应体，优先检查信封字段
    pub fn parse(body: &[u8], envelope_key: &str) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(mut object)) => match object.remove(envelope_key) {
                Some(Value::Object(inner)) => Self::Enveloped(inner),
                Some(other) => {
                    // 信封字段不是对象时按裸对象处理
                    object.insert(envelope_key.to_string(), other);
                    Self::Bare(object)
                }
                None => Self::Bare(object),
            },
            _ => Self::Unrecognized,
        }
    }

    pub fn id(&self) -> Option<EntityId> {
        match self {
            Self::Bare(object) | Self::Enveloped(object) => object.get("id").and_then(parse_id),
            Self::Unrecognized => None,
        }
    }
}

/// 从创建接口的响应体提取新实体 ID
pub fn created_id(body: &[u8], envelope_key: &str) -> Option<EntityId> {
    ObjectShape::parse(body, envelope_key).id()
}

/// 解析 ID 值：非负整数或内容为非负整数的字符串
pub fn parse_id(value: &Value) -> Option<EntityId> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn item_id(item: &Value) -> Option<EntityId> {
    item.as_object()
        .and_then(|object| object.get("id"))
        .and_then(parse_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let shape = ListShape::parse(br#"[{"id":1},{"id":2},{"id":3}]"#, "data");
        assert!(matches!(shape, ListShape::Array(ref items) if items.len() == 3));
        assert_eq!(shape.ids(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_parse_enveloped_array() {
        let shape = ListShape::parse(br#"{"data":[{"id":1},{"id":2}]}"#, "data");
        assert!(matches!(shape, ListShape::Enveloped(_)));
        assert_eq!(shape.ids(), Some(vec![1, 2]));
    }

    #[test]
    fn test_parse_gateway_envelope() {
        let body = br#"{"mensaje":"ok","total_productos":2,"datos":[{"id":"11"},{"id":12}]}"#;
        let shape = ListShape::parse(body, "datos");
        assert_eq!(shape.ids(), Some(vec![11, 12]));

        // 信封字段名不匹配时无法识别
        assert_eq!(ListShape::parse(body, "data"), ListShape::Unrecognized);
    }

    #[test]
    fn test_unrecognized_bodies() {
        assert_eq!(ListShape::parse(b"not json", "data"), ListShape::Unrecognized);
        assert_eq!(ListShape::parse(b"", "data"), ListShape::Unrecognized);
        assert_eq!(
            ListShape::parse(br#"{"data":{"id":1}}"#, "data"),
            ListShape::Unrecognized
        );
        assert_eq!(ListShape::Unrecognized.ids(), None);
    }

    #[test]
    fn test_items_without_ids_are_skipped() {
        let shape = ListShape::parse(br#"[{"id":1},{"name":"x"},{"id":-4},{"id":"abc"},7,{"id":9}]"#, "data");
        assert_eq!(shape.ids(), Some(vec![1, 9]));

        let empty = ListShape::parse(b"[]", "data");
        assert_eq!(empty.ids(), Some(vec![]));
    }

    #[test]
    fn test_created_id() {
        assert_eq!(created_id(br#"{"data":{"id":4321}}"#, "data"), Some(4321));
        assert_eq!(created_id(br#"{"id":21,"title":"x"}"#, "data"), Some(21));
        assert_eq!(
            created_id(br#"{"mensaje":"creado","datos":{"id":"77"}}"#, "datos"),
            Some(77)
        );
        assert_eq!(created_id(br#"{"data":{"title":"no id"}}"#, "data"), None);
        assert_eq!(created_id(br#"[{"id":1}]"#, "data"), None);
        assert_eq!(created_id(b"<html>", "data"), None);
    }

    #[test]
    fn test_non_object_envelope_falls_back_to_bare() {
        assert_eq!(created_id(br#"{"data":"created","id":5}"#, "data"), Some(5));
    }
}
