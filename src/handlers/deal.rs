//! 商机的 HTTP 处理器

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    middleware::{AppState, ValidatedJson},
    models::deal::*,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub async fn create_deal(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    ValidatedJson(req): ValidatedJson<DealRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.deal_service.create(&scope, &req).await?))
}

pub async fn list_deals(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.deal_service.list(&scope).await?))
}

/// 按月统计
pub async fn deal_summary(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.deal_service.monthly_summary(&scope).await?))
}

/// 各阶段数量
pub async fn deal_stages(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.deal_service.stage_summary(&scope).await?))
}

pub async fn get_deal(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.deal_service.get(&scope, id).await?))
}

pub async fn update_deal(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<DealRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.deal_service.update(&scope, id, &req).await?))
}

pub async fn delete_deal(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.deal_service.delete(&scope, id).await?;
    Ok(Json(json!({"message": "Deal deleted successfully"})))
}
