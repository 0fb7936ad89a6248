//! 角色查询

use crate::{error::AppError, middleware::AppState, repository::RoleStore};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// 列出所有角色（公开）
pub async fn list_roles(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let roles = state.store.list_roles().await?;
    Ok(Json(roles))
}
