//! 联系人的 HTTP 处理器

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    middleware::{AppState, ValidatedJson},
    models::contact::*,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    ValidatedJson(req): ValidatedJson<ContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.contact_service.create(&scope, &req).await?))
}

pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.contact_service.list(&scope).await?))
}

pub async fn get_contact(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.contact_service.get(&scope, id).await?))
}

pub async fn update_contact(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.contact_service.update(&scope, id, &req).await?))
}

pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.contact_service.delete(&scope, id).await?;
    Ok(Json(json!({"message": "Contact deleted successfully"})))
}
