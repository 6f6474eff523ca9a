//! Command Builder - calibredb 参数构建
//!
//! 四种操作模式（sort / search / add / update）都是纯函数：
//! 输入基础参数和领域参数，返回扩展后的参数。
//! `CommandBuilder` 负责拼装程序路径、书库参数和子命令。

use std::path::{Path, PathBuf};

use super::fields::{settable, OperationKind};
use super::format::{format_value, Rendered};
use super::library::{Credentials, LibraryLocation};
use super::request::CommandRequest;
use super::sort::SortSpec;
use crate::domain::book::{Automerge, BookId, BookRecord};

/// 追加排序参数
///
/// 没有降序键时总是带 `--ascending`；至少一个有效键时才带 `--sort-by`。
pub fn with_sort<S: AsRef<str>>(mut args: Vec<String>, keys: &[S]) -> Vec<String> {
    let spec = SortSpec::from_keys(keys);
    if !spec.rejected.is_empty() {
        tracing::warn!(
            keys = %spec.rejected.join(", "),
            "Ignoring unsupported sort keys"
        );
    }

    if !spec.descending {
        args.push("--ascending".to_string());
    }
    if !spec.fields.is_empty() {
        args.push(format!("--sort-by={}", spec.fields.join(",")));
    }
    args
}

/// 追加搜索参数，多个搜索词用空格连接为一个参数
pub fn with_search<S: AsRef<str>>(mut args: Vec<String>, terms: &[S]) -> Vec<String> {
    if terms.is_empty() {
        return args;
    }
    let joined = terms.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
    args.push("--search".to_string());
    args.push(joined);
    args
}

/// 追加 add 模式的元数据参数：`--<flag> <value>`
///
/// 标识符逐项重复 `--identifier key:value`，不做逗号连接。
pub fn with_add_fields(mut args: Vec<String>, record: &BookRecord) -> Vec<String> {
    for (name, value) in record.iter() {
        let Some(spec) = settable(OperationKind::Add, name) else {
            continue;
        };
        let Some(rendered) = format_value(spec.shape, value) else {
            continue;
        };

        let flag = format!("--{}", spec.flag);
        match rendered {
            Rendered::Single(value) => {
                args.push(flag);
                args.push(value);
            }
            Rendered::Entries(entries) => {
                for entry in entries {
                    args.push(flag.clone());
                    args.push(entry);
                }
            }
        }
    }
    args
}

/// 追加 update 模式的元数据参数：`--field <name>:<value>`
pub fn with_update_fields(mut args: Vec<String>, record: &BookRecord) -> Vec<String> {
    for (name, value) in record.iter() {
        let Some(spec) = settable(OperationKind::Update, name) else {
            continue;
        };
        let Some(rendered) = format_value(spec.shape, value) else {
            continue;
        };

        args.push("--field".to_string());
        args.push(format!("{}:{}", spec.flag, rendered.joined()));
    }
    args
}

/// add 的书籍来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddSource {
    /// 一个或多个书籍文件
    Files(Vec<PathBuf>),
    /// 不带格式文件的空记录（`add --empty`）
    Empty,
}

/// 命令构建器
///
/// 持有可执行文件路径和书库参数，为每种操作产出完整的 `CommandRequest`。
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: PathBuf,
    library: LibraryLocation,
    credentials: Option<Credentials>,
}

impl CommandBuilder {
    /// 凭据只在远程书库时转发
    pub fn new(
        program: impl Into<PathBuf>,
        library: LibraryLocation,
        credentials: Option<Credentials>,
    ) -> Self {
        let credentials = match credentials {
            Some(_) if !library.is_remote() => {
                tracing::warn!("Credentials are ignored for a local library");
                None
            }
            other => other,
        };

        Self {
            program: program.into(),
            library,
            credentials,
        }
    }

    pub fn library(&self) -> &LibraryLocation {
        &self.library
    }

    fn base(&self, subcommand: &str) -> Vec<String> {
        let mut args = vec!["--with-library".to_string(), self.library.as_arg()];
        if let Some(credentials) = &self.credentials {
            args.push("--username".to_string());
            args.push(credentials.username.clone());
            args.push("--password".to_string());
            args.push(credentials.password.clone());
        }
        args.push(subcommand.to_string());
        args
    }

    fn request(&self, args: Vec<String>) -> CommandRequest {
        CommandRequest::new(self.program.clone(), args)
    }

    /// `calibredb --version`
    pub fn version(&self) -> CommandRequest {
        self.request(vec!["--version".to_string()])
    }

    /// `list`，`limit` 为 `None` 时返回全部结果
    pub fn list<S: AsRef<str>>(&self, sort: &[S], search: &[S], limit: Option<u32>) -> CommandRequest {
        let mut args = self.base("list");
        args.push("--for-machine".to_string());
        args.push("--fields=all".to_string());
        args.push(match limit {
            Some(limit) => format!("--limit={}", limit),
            None => "--limit=all".to_string(),
        });

        let args = with_sort(args, sort);
        let args = with_search(args, search);
        self.request(args)
    }

    /// 按 ID 查询单本书
    pub fn get(&self, id: BookId) -> CommandRequest {
        let mut args = self.base("list");
        args.extend([
            "--for-machine".to_string(),
            "--fields=all".to_string(),
            format!("--search=id:{}", id),
            "--limit=1".to_string(),
        ]);
        self.request(args)
    }

    /// `add`
    pub fn add(&self, source: &AddSource, record: &BookRecord, automerge: Automerge) -> CommandRequest {
        let mut args = self.base("add");
        match source {
            AddSource::Files(paths) => {
                args.extend(paths.iter().map(|p| p.display().to_string()));
            }
            AddSource::Empty => args.push("--empty".to_string()),
        }
        args.push(format!("--automerge={}", automerge));

        self.request(with_add_fields(args, record))
    }

    /// `set_metadata <id>`
    pub fn update(&self, id: BookId, record: &BookRecord) -> CommandRequest {
        let mut args = self.base("set_metadata");
        args.push(id.to_string());

        self.request(with_update_fields(args, record))
    }

    /// `remove 1,2,3`
    pub fn remove(&self, ids: &[BookId], permanent: bool) -> CommandRequest {
        let mut args = self.base("remove");
        args.push(
            ids.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        );
        if permanent {
            args.push("--permanent".to_string());
        }
        self.request(args)
    }

    /// `export`：只导出格式文件，全部放进 `to_dir` 一层目录
    ///
    /// `formats` 为空时导出所有格式。
    pub fn export<S: AsRef<str>>(&self, ids: &[BookId], to_dir: &Path, formats: &[S]) -> CommandRequest {
        let mut args = self.base("export");
        args.extend([
            "--dont-write-opf".to_string(),
            "--dont-save-cover".to_string(),
            "--single-dir".to_string(),
            format!("--to-dir={}", to_dir.display()),
        ]);

        let formats: Vec<&str> = formats
            .iter()
            .map(|f| f.as_ref().trim())
            .filter(|f| !f.is_empty())
            .collect();
        if !formats.is_empty() {
            args.push("--formats".to_string());
            args.push(formats.join(","));
        }

        args.extend(ids.iter().map(ToString::to_string));
        self.request(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn sorted(keys: &[&str]) -> Vec<String> {
        with_sort(base(&["calibredb", "list"]), keys)
    }

    #[test]
    fn test_sort_ascending() {
        assert_eq!(sorted(&["id"]), base(&["calibredb", "list", "--ascending", "--sort-by=id"]));
    }

    #[test]
    fn test_sort_descending() {
        assert_eq!(sorted(&["-id"]), base(&["calibredb", "list", "--sort-by=id"]));
    }

    #[test]
    fn test_sort_multiple_keys_keep_order() {
        assert_eq!(
            sorted(&["title", "authors", "uuid"]),
            base(&["calibredb", "list", "--ascending", "--sort-by=title,authors,uuid"])
        );
    }

    #[test]
    fn test_sort_any_descending_key_toggles_whole_command() {
        assert_eq!(
            sorted(&["title", "authors", "-uuid"]),
            base(&["calibredb", "list", "--sort-by=title,authors,uuid"])
        );
    }

    #[test]
    fn test_sort_empty_and_invalid() {
        assert_eq!(sorted(&[]), base(&["calibredb", "list", "--ascending"]));
        assert_eq!(sorted(&["not_exist"]), base(&["calibredb", "list", "--ascending"]));
        assert_eq!(
            sorted(&["title", "not_exist"]),
            base(&["calibredb", "list", "--ascending", "--sort-by=title"])
        );
    }

    #[test]
    fn test_search() {
        let list = base(&["calibredb", "list"]);
        assert_eq!(
            with_search(list.clone(), &["title:foo"]),
            base(&["calibredb", "list", "--search", "title:foo"])
        );
        assert_eq!(
            with_search(list.clone(), &["title:foo", "id:5", "series:bar"]),
            base(&["calibredb", "list", "--search", "title:foo id:5 series:bar"])
        );
        assert_eq!(
            with_search(list.clone(), &["title:^f*"]),
            base(&["calibredb", "list", "--search", "title:^f*"])
        );
        assert_eq!(with_search::<&str>(list.clone(), &[]), list);
    }

    #[test]
    fn test_add_fields_simple() {
        let record = BookRecord::new().with("series_index", 4.5).with("title", "foobar");
        assert_eq!(
            with_add_fields(base(&["calibredb", "add"]), &record),
            base(&["calibredb", "add", "--series-index", "4.5", "--title", "foobar"])
        );
    }

    #[test]
    fn test_add_identifiers_repeat_flag() {
        let record = BookRecord::new().with("identifiers", json!({"isbn": "abcd", "asin": 1234}));
        assert_eq!(
            with_add_fields(base(&["calibredb", "add"]), &record),
            base(&[
                "calibredb",
                "add",
                "--identifier",
                "isbn:abcd",
                "--identifier",
                "asin:1234"
            ])
        );
    }

    #[test]
    fn test_add_fields_after_identifiers_are_kept() {
        let record = BookRecord::new()
            .with("identifiers", json!({"isbn": "abcd"}))
            .with("title", "foo");
        assert_eq!(
            with_add_fields(base(&["calibredb", "add"]), &record),
            base(&["calibredb", "add", "--identifier", "isbn:abcd", "--title", "foo"])
        );
    }

    #[test]
    fn test_add_lists_with_spaces() {
        let record = BookRecord::new()
            .with("authors", json!(["John Doe", " Ben Adams"]))
            .with("languages", json!(["english ", " french"]))
            .with("tags", json!(["foo", "bar", " two words "]));
        assert_eq!(
            with_add_fields(base(&["calibredb", "add"]), &record),
            base(&[
                "calibredb",
                "add",
                "--authors",
                "John Doe & Ben Adams",
                "--languages",
                "english,french",
                "--tags",
                "foo,bar,two words"
            ])
        );
    }

    #[test]
    fn test_add_drops_unsettable_fields() {
        let record = BookRecord::new().with("title", "foobar").with("id", 1234);
        assert_eq!(
            with_add_fields(base(&["calibredb", "add"]), &record),
            base(&["calibredb", "add", "--title", "foobar"])
        );

        let record = BookRecord::new()
            .with("pubdate", "1234")
            .with("size", 1234)
            .with("mystery", "x");
        assert_eq!(
            with_add_fields(base(&["calibredb", "add"]), &record),
            base(&["calibredb", "add"])
        );
    }

    #[test]
    fn test_update_fields() {
        let update = base(&["calibredb", "set_metadata", "1"]);
        assert_eq!(
            with_update_fields(update.clone(), &BookRecord::new().with("title", "foobar")),
            base(&["calibredb", "set_metadata", "1", "--field", "title:foobar"])
        );
        assert_eq!(
            with_update_fields(update.clone(), &BookRecord::new().with("series_index", 4.0)),
            base(&["calibredb", "set_metadata", "1", "--field", "series_index:4.0"])
        );
    }

    #[test]
    fn test_update_lists_and_authors() {
        let update = base(&["calibredb", "set_metadata", "1"]);
        assert_eq!(
            with_update_fields(
                update.clone(),
                &BookRecord::new().with("tags", json!(["foo", "bar", " two words"]))
            ),
            base(&["calibredb", "set_metadata", "1", "--field", "tags:foo,bar,two words"])
        );
        assert_eq!(
            with_update_fields(
                update.clone(),
                &BookRecord::new().with("authors", json!(["John Doe", " Ben Adams"]))
            ),
            base(&["calibredb", "set_metadata", "1", "--field", "authors:John Doe & Ben Adams"])
        );
    }

    #[test]
    fn test_update_identifiers_single_field() {
        let record = BookRecord::new().with("identifiers", json!({"isbn": 1234, "asin": "abcd"}));
        assert_eq!(
            with_update_fields(base(&["calibredb", "set_metadata", "1"]), &record),
            base(&["calibredb", "set_metadata", "1", "--field", "identifiers:isbn:1234,asin:abcd"])
        );
    }

    #[test]
    fn test_update_drops_identity_and_readonly_fields() {
        let update = base(&["calibredb", "set_metadata", "1"]);
        let record = BookRecord::new().with("title", "foobar").with("uuid", "abcd1234");
        assert_eq!(
            with_update_fields(update.clone(), &record),
            base(&["calibredb", "set_metadata", "1", "--field", "title:foobar"])
        );

        let record = BookRecord::new().with("uuid", "1234").with("cover", "test");
        assert_eq!(with_update_fields(update.clone(), &record), update);
    }

    fn local_builder() -> CommandBuilder {
        CommandBuilder::new(
            "/opt/calibre/calibredb",
            LibraryLocation::parse("/library"),
            None,
        )
    }

    #[test]
    fn test_builder_list() {
        let request = local_builder().list(&["-title"], &["tags:foo"], Some(5000));
        assert_eq!(
            request.args(),
            base(&[
                "--with-library",
                "/library",
                "list",
                "--for-machine",
                "--fields=all",
                "--limit=5000",
                "--sort-by=title",
                "--search",
                "tags:foo"
            ])
            .as_slice()
        );
    }

    #[test]
    fn test_builder_add_empty_without_metadata() {
        let request = local_builder().add(&AddSource::Empty, &BookRecord::new(), Automerge::Ignore);
        assert_eq!(
            request.args(),
            base(&["--with-library", "/library", "add", "--empty", "--automerge=ignore"]).as_slice()
        );
    }

    #[test]
    fn test_builder_add_files() {
        let source = AddSource::Files(vec![PathBuf::from("/tmp/a.epub"), PathBuf::from("/tmp/b.pdf")]);
        let record = BookRecord::new().with("title", "x");
        let request = local_builder().add(&source, &record, Automerge::Overwrite);
        assert_eq!(
            request.args(),
            base(&[
                "--with-library",
                "/library",
                "add",
                "/tmp/a.epub",
                "/tmp/b.pdf",
                "--automerge=overwrite",
                "--title",
                "x"
            ])
            .as_slice()
        );
    }

    #[test]
    fn test_builder_update_and_remove() {
        let id = BookId::new(7).unwrap();
        let request = local_builder().update(id, &BookRecord::new().with("title", "x"));
        assert_eq!(
            request.args(),
            base(&["--with-library", "/library", "set_metadata", "7", "--field", "title:x"]).as_slice()
        );

        let ids = [BookId::new(1).unwrap(), BookId::new(2).unwrap()];
        let request = local_builder().remove(&ids, true);
        assert_eq!(
            request.args(),
            base(&["--with-library", "/library", "remove", "1,2", "--permanent"]).as_slice()
        );
    }

    #[test]
    fn test_builder_export() {
        let ids = [BookId::new(3).unwrap(), BookId::new(5).unwrap()];
        let request = local_builder().export::<&str>(&ids, Path::new("/tmp/out"), &[]);
        assert_eq!(
            request.args(),
            base(&[
                "--with-library",
                "/library",
                "export",
                "--dont-write-opf",
                "--dont-save-cover",
                "--single-dir",
                "--to-dir=/tmp/out",
                "3",
                "5"
            ])
            .as_slice()
        );

        let request = local_builder().export(&ids[..1], Path::new("/tmp/out"), &["epub", " pdf ", ""]);
        assert_eq!(&request.args()[7..], base(&["--formats", "epub,pdf", "3"]).as_slice());
    }

    #[test]
    fn test_credentials_forwarded_only_for_remote_library() {
        let creds = Credentials::from_parts("user", "pass");

        let remote = CommandBuilder::new(
            "calibredb",
            LibraryLocation::parse("http://localhost:8080/#books"),
            creds.clone(),
        );
        let args = remote.get(BookId::new(1).unwrap()).args().to_vec();
        assert_eq!(&args[2..6], base(&["--username", "user", "--password", "pass"]).as_slice());

        let local = CommandBuilder::new("calibredb", LibraryLocation::parse("/library"), creds);
        let args = local.get(BookId::new(1).unwrap()).args().to_vec();
        assert!(!args.contains(&"--username".to_string()));
    }

    #[test]
    fn test_version_has_no_library_arguments() {
        assert_eq!(local_builder().version().args(), base(&["--version"]).as_slice());
    }
}
