//! Book HTTP Handlers

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, Path, RawQuery, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::application::{AddBook, GetBook, ListBooks, RemoveBooks, UpdateBook};
use crate::domain::book::BookId;
use crate::domain::command::AddSource;
use crate::infrastructure::http::dto::{
    parse_ids, AddedResponse, BookPayload, BookResponse, BooksResponse, ListParams, PaginatedBooks,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::upload::{multipart_error, UploadDir};

// ============================================================================
// Helpers
// ============================================================================

fn require_json(headers: &HeaderMap) -> Result<(), ApiError> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        Ok(())
    } else {
        Err(ApiError::UnsupportedMediaType(
            "Only application/json allowed".to_string(),
        ))
    }
}

// ============================================================================
// Queries
// ============================================================================

/// 分页列出书籍
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let params = ListParams::from_query(query.as_deref())?;

    let books = state
        .list_books_handler
        .handle(ListBooks {
            sort: params.sort.clone(),
            search: params.search.clone(),
        })
        .await?;

    if books.is_empty() {
        return Ok((StatusCode::NO_CONTENT, Json(BooksResponse { books })).into_response());
    }

    let page = PaginatedBooks::paginate(books, &params)?;
    Ok(Json(page).into_response())
}

/// 获取单本书
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = BookId::new(id)?;
    let book = state.get_book_handler.handle(GetBook { id }).await?;
    Ok(Json(BookResponse { books: book }))
}

// ============================================================================
// Commands
// ============================================================================

/// 上传书籍文件（multipart：`file` 文件部分 + 可选 `data` JSON）
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<AddedResponse>), ApiError> {
    let mut multipart = multipart.map_err(|_| {
        ApiError::UnsupportedMediaType("Only multipart/form-data allowed".to_string())
    })?;

    let mut uploads = UploadDir::new()?;
    let mut payload = BookPayload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        match (name.as_str(), file_name) {
            ("data", None) => {
                let data = field.bytes().await.map_err(multipart_error)?;
                payload = BookPayload::from_json(&data)?;
            }
            (_, Some(file_name)) => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                uploads.save(&file_name, &bytes).await?;
            }
            (other, None) => {
                tracing::debug!(field = %other, "Ignoring multipart field");
            }
        }
    }

    if uploads.files().is_empty() {
        return Err(ApiError::Unprocessable("No file(s) provided".to_string()));
    }

    let response = state
        .add_book_handler
        .handle(AddBook {
            source: AddSource::Files(uploads.files().to_vec()),
            record: payload.record,
            automerge: payload.automerge.unwrap_or_default(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AddedResponse { id: response.ids })))
}

/// 添加空书籍（可选 JSON 元数据）
pub async fn add_empty_book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<AddedResponse>), ApiError> {
    require_json(&headers)?;
    let payload = BookPayload::from_json(&body)?;

    let response = state
        .add_book_handler
        .handle(AddBook {
            source: AddSource::Empty,
            record: payload.record,
            automerge: payload.automerge.unwrap_or_default(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AddedResponse { id: response.ids })))
}

/// 更新书籍元数据，返回更新后的书籍
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<BookResponse>, ApiError> {
    require_json(&headers)?;
    let id = BookId::new(id)?;

    let payload = BookPayload::from_json(&body)?;
    if payload.automerge.is_some() {
        return Err(ApiError::Unprocessable("Unknown field: automerge".to_string()));
    }
    if payload.is_empty() {
        return Err(ApiError::BadRequest("No data provided".to_string()));
    }

    let book = state
        .update_book_handler
        .handle(UpdateBook {
            id,
            record: payload.record,
        })
        .await?;

    Ok(Json(BookResponse { books: book }))
}

/// 删除单本书
pub async fn remove_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let id = BookId::new(id)?;
    remove(&state, vec![id]).await
}

/// 批量删除书籍（`?id=1,2`）
pub async fn remove_books(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<StatusCode, ApiError> {
    let ids = parse_ids(query.as_deref())?;
    remove(&state, ids).await
}

async fn remove(state: &AppState, ids: Vec<BookId>) -> Result<StatusCode, ApiError> {
    state
        .remove_books_handler
        .handle(RemoveBooks {
            ids,
            permanent: false,
        })
        .await?;
    Ok(StatusCode::OK)
}
