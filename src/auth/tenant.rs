//! 租户范围解析
//! 每个业务请求都通过 [`TenantScope`] 取得组织 ID 与成员 ID

use crate::{
    auth::middleware::AuthContext,
    config::{AnonymousPolicy, TenancyConfig},
    error::AppError,
    middleware::AppState,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// 当前请求的租户范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantScope {
    org_id: i64,
    member_id: i64,
    role: Option<String>,
    authenticated: bool,
}

impl TenantScope {
    /// 根据认证上下文与租户策略解析
    ///
    /// 没有身份时，`fallback` 策略返回配置的默认租户，`reject` 策略返回 401。
    pub fn resolve(
        auth: Option<&AuthContext>,
        tenancy: &TenancyConfig,
    ) -> Result<Self, AppError> {
        if let Some(ctx) = auth {
            return Ok(Self {
                org_id: ctx.org_id,
                member_id: ctx.member_id,
                role: Some(ctx.role.clone()),
                authenticated: true,
            });
        }

        match tenancy.anonymous_policy {
            AnonymousPolicy::Fallback => {
                tracing::warn!(
                    org_id = tenancy.default_org_id,
                    member_id = tenancy.default_member_id,
                    "Anonymous request scoped to the default tenant"
                );
                Ok(Self {
                    org_id: tenancy.default_org_id,
                    member_id: tenancy.default_member_id,
                    role: None,
                    authenticated: false,
                })
            }
            AnonymousPolicy::Reject => Err(AppError::Unauthorized),
        }
    }

    pub fn organization_id(&self) -> i64 {
        self.org_id
    }

    pub fn member_id(&self) -> i64 {
        self.member_id
    }

    /// 角色名（匿名回退时为 None）
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// 角色校验：已认证但角色不在列表中返回 403
    ///
    /// 匿名回退请求不带角色，直接放行。
    pub fn require_any_role(&self, roles: &[&str]) -> Result<(), AppError> {
        match self.role() {
            Some(role) if !roles.contains(&role) => {
                tracing::debug!(role, required = ?roles, "Role not permitted");
                Err(AppError::Forbidden)
            }
            _ => Ok(()),
        }
    }
}

impl FromRequestParts<Arc<AppState>> for TenantScope {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Self::resolve(parts.extensions.get::<AuthContext>(), &state.config.tenancy)
    }
}
