//! 组织的 HTTP 处理器

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    middleware::{AppState, ValidatedJson},
    models::organization::*,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 列出组织（只包含调用方所在组织）
pub async fn list_organizations(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.organization_service.list(&scope).await?))
}

pub async fn get_organization(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.organization_service.get(&scope, id).await?))
}

pub async fn update_organization(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<OrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        state.organization_service.update(&scope, id, &req).await?,
    ))
}

/// 删除组织及其全部数据
pub async fn delete_organization(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.organization_service.delete(&scope, id).await?;
    Ok(Json(json!({"message": "Organization deleted successfully"})))
}
