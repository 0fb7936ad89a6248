//! JWT 认证中间件
//! 宽松模式：令牌缺失或无效时请求以匿名身份继续，由下游决定是否需要身份

use crate::{auth::jwt::JwtService, error::AppError};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::jwt::Claims;

/// 认证上下文（附加到请求扩展，仅在当前请求内有效）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub subject: String,
    pub role: String,
    pub org_id: i64,
    pub member_id: i64,
    pub expires_at: i64,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
            org_id: claims.org_id,
            member_id: claims.member_id,
            expires_at: claims.exp,
        }
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头提取令牌（必须是 "Bearer <token>"）
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .ok_or(AppError::Unauthorized)
}

/// 可选认证：从不拦截请求
pub async fn optional_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Ok(token) = extract_token(req.headers()) {
        match jwt_service.verify(&token) {
            Ok(claims) => {
                tracing::debug!(
                    subject = %claims.sub,
                    org_id = claims.org_id,
                    role = %claims.role,
                    "Request authenticated"
                );
                req.extensions_mut().insert(AuthContext::from(claims));
            }
            Err(reason) => {
                // 无效令牌与未携带令牌等价
                tracing::debug!(reason = %reason, "Ignoring bearer token, continuing anonymously");
            }
        }
    }

    next.run(req).await
}
