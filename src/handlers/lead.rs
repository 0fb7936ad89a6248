//! 线索的 HTTP 处理器

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    middleware::{AppState, ValidatedJson},
    models::lead::*,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 创建线索
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    ValidatedJson(req): ValidatedJson<LeadRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lead_service.create(&scope, &req).await?))
}

/// 列出本组织线索
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lead_service.list(&scope).await?))
}

/// 按月统计
pub async fn lead_summary(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lead_service.monthly_summary(&scope).await?))
}

pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lead_service.get(&scope, id).await?))
}

pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<LeadRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lead_service.update(&scope, id, &req).await?))
}

/// 设置验证状态：`PUT /api/leads/{id}/status?isVerified=true`
pub async fn update_lead_status(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
    Query(query): Query<LeadStatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        state
            .lead_service
            .set_verified(&scope, id, query.is_verified)
            .await?,
    ))
}

pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.lead_service.delete(&scope, id).await?;
    Ok(Json(json!({"message": "Lead deleted successfully"})))
}
