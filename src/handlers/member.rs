//! 成员管理的 HTTP 处理器

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    middleware::{AppState, ValidatedJson},
    models::member::*,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 列出本组织成员
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.member_service.list(&scope).await?))
}

/// 创建成员
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    ValidatedJson(req): ValidatedJson<CreateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.member_service.create(&scope, &req).await?))
}

/// 获取成员详情
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.member_service.get(&scope, id).await?))
}

/// 更新成员
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.member_service.update(&scope, id, &req).await?))
}

/// 修改成员状态
pub async fn update_member_status(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<MemberStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        state
            .member_service
            .change_status(&scope, id, req.status)
            .await?,
    ))
}

/// 删除成员
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.member_service.delete(&scope, id).await?;
    Ok(Json(json!({"message": "Member deleted successfully"})))
}
