//! Health Handler

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{GetVersion, VersionResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 健康检查：返回 calibredb 与服务自身的版本
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<VersionResponse>, ApiError> {
    let version = state.get_version_handler.handle(GetVersion).await?;
    Ok(Json(version))
}
