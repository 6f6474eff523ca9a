//! Data Transfer Objects
//!
//! 请求解析（查询参数、书籍 JSON 载荷）与响应结构

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use super::error::ApiError;
use crate::domain::book::{Automerge, Book, BookId, BookRecord};

// ============================================================================
// 查询参数
// ============================================================================

/// `GET /books` 查询参数
///
/// `sort` / `search` 可重复出现，因此直接解析原始查询串。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// 起始序号，从 1 开始
    pub start: usize,
    pub limit: usize,
    pub sort: Vec<String>,
    pub search: Vec<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            start: 1,
            limit: 20,
            sort: Vec::new(),
            search: Vec::new(),
        }
    }
}

impl ListParams {
    pub fn from_query(query: Option<&str>) -> Result<Self, ApiError> {
        let mut params = Self::default();

        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            if value.trim().is_empty() {
                continue;
            }
            match key.as_ref() {
                "start" => params.start = parse_positive("start", &value)?,
                "limit" => params.limit = parse_positive("limit", &value)?,
                "sort" => params.sort.push(value.into_owned()),
                "search" => params.search.push(value.into_owned()),
                other => tracing::debug!(param = %other, "Ignoring unknown query parameter"),
            }
        }

        Ok(params)
    }
}

fn parse_positive(name: &str, value: &str) -> Result<usize, ApiError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ApiError::BadRequest(format!(
            "{} must be a positive integer, got '{}'",
            name, value
        ))),
    }
}

/// 解析 `?id=1,2` / `?id=1&id=2` 形式的书籍 ID 列表
pub fn parse_ids(query: Option<&str>) -> Result<Vec<BookId>, ApiError> {
    let mut ids = Vec::new();

    for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        if key != "id" {
            continue;
        }
        for raw in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let id: i64 = raw
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("Invalid book id '{}'", raw)))?;
            ids.push(BookId::new(id)?);
        }
    }

    if ids.is_empty() {
        return Err(ApiError::BadRequest("No book ids provided".to_string()));
    }
    Ok(ids)
}

/// 解析 `?format=epub,pdf` / `?format=epub&format=pdf`，未给出时为空
pub fn parse_formats(query: Option<&str>) -> Vec<String> {
    form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .filter(|(key, _)| key == "format")
        .flat_map(|(_, value)| {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

// ============================================================================
// 书籍载荷
// ============================================================================

/// 载荷字段的 JSON 类型约束
#[derive(Debug, Clone, Copy)]
enum FieldType {
    Text,
    TextList,
    Object,
    Integer { minimum: Option<f64> },
    Number { minimum: Option<f64> },
}

impl FieldType {
    fn type_name(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::TextList => "array",
            Self::Object => "object",
            Self::Integer { .. } => "integer",
            Self::Number { .. } => "number",
        }
    }

    fn check(self, field: &str, value: &Value) -> Result<(), ApiError> {
        let minimum = match (self, value) {
            (Self::Text, Value::String(_)) | (Self::Object, Value::Object(_)) => return Ok(()),
            (Self::TextList, Value::Array(items)) => {
                return match items.iter().find(|item| !item.is_string()) {
                    Some(item) => Err(type_error(field, item, "string")),
                    None => Ok(()),
                };
            }
            (Self::Integer { minimum }, Value::Number(n)) if n.is_i64() || n.is_u64() => minimum,
            (Self::Number { minimum }, Value::Number(_)) => minimum,
            _ => return Err(type_error(field, value, self.type_name())),
        };

        match (minimum, value.as_f64()) {
            (Some(minimum), Some(number)) if number < minimum => Err(ApiError::Unprocessable(
                format!("{}: {} is less than the minimum of {}", field, value, minimum),
            )),
            _ => Ok(()),
        }
    }
}

fn type_error(field: &str, value: &Value, expected: &str) -> ApiError {
    ApiError::Unprocessable(format!("{}: {} is not of type '{}'", field, value, expected))
}

/// 载荷可接受的书籍字段（按 Book 声明顺序）
///
/// `formats`、`last_modified`、`template` 由 calibre 维护，不接受写入。
const PAYLOAD_FIELDS: [(&str, FieldType); 17] = [
    ("authors", FieldType::TextList),
    ("author_sort", FieldType::Text),
    ("comments", FieldType::Text),
    ("cover", FieldType::Text),
    ("id", FieldType::Integer { minimum: Some(0.0) }),
    ("identifiers", FieldType::Object),
    ("isbn", FieldType::Text),
    ("languages", FieldType::TextList),
    ("pubdate", FieldType::Text),
    ("publisher", FieldType::Text),
    ("rating", FieldType::Number { minimum: None }),
    ("series", FieldType::Text),
    ("series_index", FieldType::Number { minimum: Some(0.0) }),
    ("size", FieldType::Number { minimum: None }),
    ("tags", FieldType::TextList),
    ("timestamp", FieldType::Text),
    ("title", FieldType::Text),
];

/// 空字符串、空列表、空映射、0 和 null 都视为未提供
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Bool(_) => false,
    }
}

/// 书籍 JSON 载荷：书籍字段 + 可选的 `automerge`
#[derive(Debug, Default)]
pub struct BookPayload {
    pub record: BookRecord,
    pub automerge: Option<Automerge>,
}

impl BookPayload {
    /// 解析请求体，空请求体视为空载荷
    ///
    /// 未知字段和类型错误返回 422。校验通过的值原样进入 `BookRecord`，
    /// 数字保留请求中的字面形式。
    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("Error decoding JSON: {}", e)))?;

        let Value::Object(mut map) = value else {
            return Err(ApiError::Unprocessable(
                "Book data must be a JSON object".to_string(),
            ));
        };

        let automerge = match map.remove("automerge") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(Automerge::parse_or_default(&raw)),
            Some(other) => return Err(type_error("automerge", &other, "string")),
        };

        if let Some(unknown) = map
            .keys()
            .find(|key| !PAYLOAD_FIELDS.iter().any(|(name, _)| *name == key.as_str()))
        {
            return Err(ApiError::Unprocessable(format!("Unknown field: {}", unknown)));
        }

        let mut record = BookRecord::new();
        for (name, field_type) in PAYLOAD_FIELDS {
            let Some(value) = map.remove(name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            field_type.check(name, &value)?;
            if !is_blank(&value) {
                record.insert(name, value);
            }
        }

        Ok(Self { record, automerge })
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty() && self.automerge.is_none()
    }
}

// ============================================================================
// 响应
// ============================================================================

/// 单本书响应
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub books: Book,
}

/// 书籍列表响应（无分页信息）
#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

/// 添加书籍响应
#[derive(Debug, Serialize)]
pub struct AddedResponse {
    pub id: Vec<i64>,
}

/// 分页元数据
#[derive(Debug, Serialize)]
pub struct PageMetadata {
    pub start: usize,
    pub limit: usize,
    pub count: usize,
    #[serde(rename = "self")]
    pub self_link: String,
    /// 无上一页时为空串
    pub prev: String,
    /// 无下一页时为空串
    pub next: String,
}

/// 分页书籍列表
#[derive(Debug, Serialize)]
pub struct PaginatedBooks {
    pub books: Vec<Book>,
    pub metadata: PageMetadata,
}

impl PaginatedBooks {
    pub fn paginate(books: Vec<Book>, params: &ListParams) -> Result<Self, ApiError> {
        let count = books.len();
        let ListParams { start, limit, .. } = *params;

        if count < start {
            return Err(ApiError::BadRequest(format!(
                "start {} is larger than number of books ({})",
                start, count
            )));
        }

        let next_start = start.saturating_add(limit);
        let prev = if start == 1 {
            String::new()
        } else {
            page_link(params, start.saturating_sub(limit).max(1))
        };
        let next = if next_start > count {
            String::new()
        } else {
            page_link(params, next_start)
        };

        let metadata = PageMetadata {
            start,
            limit,
            count,
            self_link: page_link(params, start),
            prev,
            next,
        };

        Ok(Self {
            books: books.into_iter().skip(start - 1).take(limit).collect(),
            metadata,
        })
    }
}

fn page_link(params: &ListParams, start: usize) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("start", &start.to_string())
        .append_pair("limit", &params.limit.to_string());
    for key in &params.sort {
        query.append_pair("sort", key);
    }
    for term in &params.search {
        query.append_pair("search", term);
    }
    format!("/books?{}", query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn books(n: i64) -> Vec<Book> {
        (1..=n)
            .map(|id| Book {
                id,
                ..Book::default()
            })
            .collect()
    }

    #[test]
    fn test_list_params_defaults_and_repeats() {
        let params =
            ListParams::from_query(Some("sort=-title&sort=id&search=tags%3Afoo&start=")).unwrap();
        assert_eq!(params.start, 1);
        assert_eq!(params.limit, 20);
        assert_eq!(params.sort, vec!["-title", "id"]);
        assert_eq!(params.search, vec!["tags:foo"]);

        assert_eq!(ListParams::from_query(None).unwrap(), ListParams::default());
    }

    #[test]
    fn test_list_params_rejects_bad_numbers() {
        assert!(ListParams::from_query(Some("start=abc")).is_err());
        assert!(ListParams::from_query(Some("limit=0")).is_err());
        assert!(ListParams::from_query(Some("limit=-2")).is_err());
    }

    #[test]
    fn test_parse_ids() {
        let ids = parse_ids(Some("id=1,2&id=5")).unwrap();
        let values: Vec<i64> = ids.iter().map(|id| id.value()).collect();
        assert_eq!(values, vec![1, 2, 5]);

        assert!(parse_ids(Some("id=0")).is_err());
        assert!(parse_ids(Some("id=abc")).is_err());
        assert!(parse_ids(None).is_err());
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(parse_formats(Some("id=1&format=epub, pdf&format=mobi")), vec!["epub", "pdf", "mobi"]);
        assert!(parse_formats(Some("id=1")).is_empty());
        assert!(parse_formats(None).is_empty());
    }

    #[test]
    fn test_paginate_middle_page() {
        let params = ListParams {
            start: 3,
            limit: 2,
            sort: vec!["title".to_string()],
            search: vec!["a b".to_string()],
        };
        let page = PaginatedBooks::paginate(books(6), &params).unwrap();

        let ids: Vec<i64> = page.books.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(page.metadata.count, 6);
        assert_eq!(page.metadata.self_link, "/books?start=3&limit=2&sort=title&search=a+b");
        assert_eq!(page.metadata.prev, "/books?start=1&limit=2&sort=title&search=a+b");
        assert_eq!(page.metadata.next, "/books?start=5&limit=2&sort=title&search=a+b");
    }

    #[test]
    fn test_paginate_edges() {
        let params = ListParams {
            limit: 10,
            ..ListParams::default()
        };
        let page = PaginatedBooks::paginate(books(4), &params).unwrap();
        assert_eq!(page.books.len(), 4);
        assert_eq!(page.metadata.prev, "");
        assert_eq!(page.metadata.next, "");

        let params = ListParams {
            start: 5,
            ..ListParams::default()
        };
        assert!(PaginatedBooks::paginate(books(4), &params).is_err());
    }

    #[test]
    fn test_paginate_serializes_self_key() {
        let page = PaginatedBooks::paginate(books(1), &ListParams::default()).unwrap();
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["metadata"]["self"], json!("/books?start=1&limit=20"));
    }

    #[test]
    fn test_book_payload() {
        let body = br#"{"title": "Foo", "authors": ["A", "B"], "automerge": "overwrite"}"#;
        let payload = BookPayload::from_json(body).unwrap();
        assert_eq!(payload.automerge, Some(Automerge::Overwrite));
        assert_eq!(payload.record.get("title"), Some(&json!("Foo")));
        assert_eq!(payload.record.get("authors"), Some(&json!(["A", "B"])));
    }

    #[test]
    fn test_book_payload_keeps_number_literals() {
        let body = br#"{"series_index": 4, "size": 12.5, "rating": 8.0, "title": "T"}"#;
        let payload = BookPayload::from_json(body).unwrap();

        assert_eq!(payload.record.get("series_index").unwrap().to_string(), "4");
        assert_eq!(payload.record.get("size").unwrap().to_string(), "12.5");
        assert_eq!(payload.record.get("rating").unwrap().to_string(), "8.0");

        let names: Vec<&str> = payload.record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["rating", "series_index", "size", "title"]);
    }

    #[test]
    fn test_book_payload_skips_blank_values() {
        let body = br#"{"title": "", "tags": [], "series": null, "id": 0, "publisher": "P"}"#;
        let payload = BookPayload::from_json(body).unwrap();
        let names: Vec<&str> = payload.record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["publisher"]);
    }

    #[test]
    fn test_book_payload_rejects_read_only_fields() {
        let bodies: [&[u8]; 3] = [
            br#"{"formats": ["EPUB"]}"#,
            br#"{"last_modified": "2024-01-01"}"#,
            br#"{"template": "x"}"#,
        ];
        for body in bodies {
            assert!(matches!(
                BookPayload::from_json(body),
                Err(ApiError::Unprocessable(msg)) if msg.starts_with("Unknown field")
            ));
        }
    }

    #[test]
    fn test_book_payload_type_and_minimum_checks() {
        let cases: [(&[u8], &str); 5] = [
            (br#"{"id": 1.5}"#, "is not of type 'integer'"),
            (br#"{"id": -1}"#, "less than the minimum"),
            (br#"{"series_index": -0.5}"#, "less than the minimum"),
            (br#"{"tags": ["a", 1]}"#, "1 is not of type 'string'"),
            (br#"{"identifiers": "isbn"}"#, "is not of type 'object'"),
        ];
        for (body, expected) in cases {
            match BookPayload::from_json(body) {
                Err(ApiError::Unprocessable(msg)) => assert!(msg.contains(expected), "{}", msg),
                other => panic!("unexpected result: {:?}", other.map(|p| p.record)),
            }
        }
    }

    #[test]
    fn test_book_payload_invalid_automerge_falls_back() {
        let payload = BookPayload::from_json(br#"{"automerge": "bogus"}"#).unwrap();
        assert_eq!(payload.automerge, Some(Automerge::Ignore));
    }

    #[test]
    fn test_book_payload_rejections() {
        assert!(BookPayload::from_json(b"   ").unwrap().is_empty());
        assert!(matches!(
            BookPayload::from_json(b"{not json"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            BookPayload::from_json(br#"{"colour": "red"}"#),
            Err(ApiError::Unprocessable(_))
        ));
        assert!(matches!(
            BookPayload::from_json(br#"{"authors": "not a list"}"#),
            Err(ApiError::Unprocessable(_))
        ));
        assert!(matches!(
            BookPayload::from_json(br#"[1, 2]"#),
            Err(ApiError::Unprocessable(_))
        ));
    }
}
