//! Value Formatter - 字段值渲染
//!
//! 把已通过白名单的字段值渲染成 calibredb 期望的文本。
//! 格式化从不报错：无法渲染或渲染后为空的值返回 `None`，由调用方丢弃该字段。

use serde_json::{Map, Value};

use super::fields::FieldShape;

/// 渲染结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// 单个值（标量，或已连接的列表）
    Single(String),
    /// 映射的各项 `key:value`，由调用方决定重复 flag 还是用逗号连接
    Entries(Vec<String>),
}

impl Rendered {
    /// 合并为单个 token（映射项用逗号连接）
    pub fn joined(&self) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::Entries(entries) => entries.join(","),
        }
    }
}

/// 渲染字段值，`None` 表示丢弃该字段
pub fn format_value(shape: FieldShape, value: &Value) -> Option<Rendered> {
    match shape {
        FieldShape::Scalar => format_scalar(value).map(Rendered::Single),
        FieldShape::List { separator } => format_list(value, separator).map(Rendered::Single),
        FieldShape::Mapping => match value {
            Value::Object(map) => format_mapping(map).map(Rendered::Entries),
            _ => None,
        },
    }
}

/// 标量：数字保留字面形式（`4.0` 不会变成 `4`），字符串去掉首尾空白
fn format_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 列表：每个元素去空白并压缩内部空白，空元素跳过
///
/// 单个字符串视为只有一个元素的列表。
fn format_list(value: &Value, separator: &str) -> Option<String> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::String(_) => vec![value],
        _ => return None,
    };

    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let text = match item {
            Value::String(s) => normalize_whitespace(s),
            Value::Number(n) => n.to_string(),
            // 嵌套结构无法表达为命令行参数，整个字段丢弃
            _ => return None,
        };
        if !text.is_empty() {
            parts.push(text);
        }
    }

    non_empty(parts.join(separator))
}

/// 映射：每项渲染为 `key:value`，值只接受字符串或数字
fn format_mapping(map: &Map<String, Value>) -> Option<Vec<String>> {
    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        entries.push(format!("{}:{}", key, value));
    }

    if entries.is_empty() {
        None
    } else {
        Some(entries)
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
