//! Sort Specification - 排序键

/// `calibredb list --sort-by` 支持的字段
pub const SORTABLE_FIELDS: &[&str] = &[
    "author_sort",
    "authors",
    "comments",
    "cover",
    "formats",
    "id",
    "identifiers",
    "isbn",
    "languages",
    "last_modified",
    "pubdate",
    "publisher",
    "rating",
    "series",
    "series_index",
    "size",
    "tags",
    "template",
    "timestamp",
    "title",
    "uuid",
];

/// 单个排序键，`-` 前缀表示降序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('-') {
            Some(field) => Self {
                field: field.to_string(),
                descending: true,
            },
            None => Self {
                field: raw.to_string(),
                descending: false,
            },
        }
    }

    pub fn is_sortable(&self) -> bool {
        SORTABLE_FIELDS.contains(&self.field.as_str())
    }
}

/// 过滤后的排序规格
///
/// 降序是整条命令的开关：任一有效键带 `-` 前缀即整体降序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    /// 有效键（已去掉前缀，保持输入顺序）
    pub fields: Vec<String>,
    pub descending: bool,
    /// 被丢弃的原始键
    pub rejected: Vec<String>,
}

impl SortSpec {
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Self {
        let mut spec = Self::default();
        for raw in keys {
            let raw = raw.as_ref();
            let key = SortKey::parse(raw);
            if key.is_sortable() {
                spec.descending |= key.descending;
                spec.fields.push(key.field);
            } else {
                spec.rejected.push(raw.to_string());
            }
        }
        spec
    }
}
