//! 活动的 HTTP 处理器

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    middleware::{AppState, ValidatedJson},
    models::activity::*,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub async fn create_activity(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    ValidatedJson(req): ValidatedJson<ActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.activity_service.create(&scope, &req).await?))
}

pub async fn list_activities(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.activity_service.list(&scope).await?))
}

pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.activity_service.get(&scope, id).await?))
}

pub async fn update_activity(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.activity_service.update(&scope, id, &req).await?))
}

pub async fn delete_activity(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.activity_service.delete(&scope, id).await?;
    Ok(Json(json!({"message": "Activity deleted successfully"})))
}
