//! Book Context - Entities

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 书籍实体
///
/// 字段与 `calibredb list --for-machine --fields=all` 的 JSON 输出一一对应。
/// calibre 对缺失的元数据可能省略键或输出 `null`，两者都还原为默认值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, deserialize_with = "nullable")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub author_sort: String,
    /// HTML 格式
    #[serde(default, deserialize_with = "nullable")]
    pub comments: String,
    #[serde(default, deserialize_with = "nullable")]
    pub cover: String,
    #[serde(default, deserialize_with = "nullable")]
    pub formats: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub id: i64,
    /// 标识符，值可以是字符串或数字（如 `{"isbn": "abcd", "asin": 1234}`）
    #[serde(default, deserialize_with = "nullable")]
    pub identifiers: Map<String, Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub isbn: String,
    #[serde(default, deserialize_with = "nullable")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_modified: String,
    #[serde(default, deserialize_with = "nullable")]
    pub pubdate: String,
    #[serde(default, deserialize_with = "nullable")]
    pub publisher: String,
    #[serde(default, deserialize_with = "nullable")]
    pub rating: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub series: String,
    #[serde(default, deserialize_with = "nullable")]
    pub series_index: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub size: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub template: String,
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub uuid: String,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
