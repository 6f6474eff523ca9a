//! Book Context - BookRecord

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 书籍元数据记录
///
/// 调用方提供的「字段名 → 值」映射，保持插入顺序。
/// 记录本身不做校验：未知字段、只读字段、无法格式化的值都在构建命令时被静默丢弃。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookRecord(Map<String, Value>);

impl BookRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// 插入字段（已存在时覆盖值，保留原位置）
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// 链式插入，便于构造
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// 按记录顺序遍历字段
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for BookRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for BookRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
