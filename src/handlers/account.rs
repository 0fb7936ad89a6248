//! 客户账户的 HTTP 处理器

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    middleware::{AppState, ValidatedJson},
    models::account::*,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub async fn create_account(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    ValidatedJson(req): ValidatedJson<AccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.account_service.create(&scope, &req).await?))
}

pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.account_service.list(&scope).await?))
}

pub async fn get_account(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.account_service.get(&scope, id).await?))
}

pub async fn update_account(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<AccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.account_service.update(&scope, id, &req).await?))
}

pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.account_service.delete(&scope, id).await?;
    Ok(Json(json!({"message": "Account deleted successfully"})))
}
