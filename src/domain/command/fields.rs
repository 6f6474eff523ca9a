//! Field Validator - 字段白名单
//!
//! 给定操作类型（add/update）和字段名，返回字段是否可设置及其值形态。
//! 纯查表，没有副作用。

/// 需要字段白名单的操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Add,
    Update,
}

/// 字段值形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// 标量，原样输出
    Scalar,
    /// 列表，元素去空白后用 `separator` 连接
    List { separator: &'static str },
    /// 映射，每项渲染为 `key:value`
    Mapping,
}

/// 作者之间的分隔符
pub const AUTHOR_SEPARATOR: &str = " & ";
/// 其他列表字段的分隔符
pub const LIST_SEPARATOR: &str = ",";

/// 可设置字段描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// 记录中的字段名
    pub name: &'static str,
    /// 命令行中的名字（add: `--<flag>`，update: `--field <flag>:...`）
    pub flag: &'static str,
    pub shape: FieldShape,
}

const fn scalar(name: &'static str, flag: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        flag,
        shape: FieldShape::Scalar,
    }
}

const fn list(name: &'static str, separator: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        flag: name,
        shape: FieldShape::List { separator },
    }
}

const fn mapping(name: &'static str, flag: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        flag,
        shape: FieldShape::Mapping,
    }
}

/// `calibredb add` 接受的元数据
const ADD_FIELDS: &[FieldSpec] = &[
    list("authors", AUTHOR_SEPARATOR),
    mapping("identifiers", "identifier"),
    scalar("isbn", "isbn"),
    list("languages", LIST_SEPARATOR),
    scalar("series", "series"),
    scalar("series_index", "series-index"),
    list("tags", LIST_SEPARATOR),
    scalar("title", "title"),
];

/// `calibredb set_metadata --field` 接受的元数据
///
/// id、uuid 用于定位目标记录，cover、pubdate 只读，均不在此列。
const UPDATE_FIELDS: &[FieldSpec] = &[
    scalar("author_sort", "author_sort"),
    list("authors", AUTHOR_SEPARATOR),
    scalar("comments", "comments"),
    mapping("identifiers", "identifiers"),
    list("languages", LIST_SEPARATOR),
    scalar("publisher", "publisher"),
    scalar("rating", "rating"),
    scalar("series", "series"),
    scalar("series_index", "series_index"),
    scalar("size", "size"),
    list("tags", LIST_SEPARATOR),
    scalar("timestamp", "timestamp"),
    scalar("title", "title"),
];

/// 查询字段在指定操作下是否可设置
pub fn settable(kind: OperationKind, name: &str) -> Option<&'static FieldSpec> {
    let fields = match kind {
        OperationKind::Add => ADD_FIELDS,
        OperationKind::Update => UPDATE_FIELDS,
    };
    fields.iter().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_flag_names() {
        assert_eq!(settable(OperationKind::Add, "series_index").unwrap().flag, "series-index");
        assert_eq!(settable(OperationKind::Add, "identifiers").unwrap().flag, "identifier");
        assert_eq!(
            settable(OperationKind::Add, "authors").unwrap().shape,
            FieldShape::List { separator: " & " }
        );
    }

    #[test]
    fn test_update_rejects_identity_fields() {
        for name in ["id", "uuid", "cover", "pubdate"] {
            assert!(settable(OperationKind::Update, name).is_none(), "{name}");
        }
        assert!(settable(OperationKind::Update, "comments").is_some());
    }

    #[test]
    fn test_add_rejects_unsettable_fields() {
        for name in ["id", "uuid", "cover", "pubdate", "size", "comments", "nonsense"] {
            assert!(settable(OperationKind::Add, name).is_none(), "{name}");
        }
    }

    #[test]
    fn test_update_uses_field_name_as_flag() {
        let spec = settable(OperationKind::Update, "series_index").unwrap();
        assert_eq!(spec.flag, "series_index");
        assert_eq!(spec.shape, FieldShape::Scalar);
    }
}
