//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{error::AppError, handlers, middleware::AppState};

/// 创建应用路由
///
/// 所有 `/api` 路由都经过可选认证中间件；是否需要身份由各处理器的
/// 提取器（`AuthContext` / `TenantScope`）决定。
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 认证与角色
    let auth_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/me", get(handlers::auth::get_current_identity))
        .route("/api/roles", get(handlers::role::list_roles));

    // 租户范围内的业务资源
    let tenant_routes = Router::new()
        // 组织
        .route(
            "/api/organizations",
            get(handlers::organization::list_organizations),
        )
        .route(
            "/api/organizations/{id}",
            get(handlers::organization::get_organization)
                .put(handlers::organization::update_organization)
                .delete(handlers::organization::delete_organization),
        )
        // 成员
        .route(
            "/api/members",
            get(handlers::member::list_members).post(handlers::member::create_member),
        )
        .route(
            "/api/members/{id}",
            get(handlers::member::get_member)
                .put(handlers::member::update_member)
                .delete(handlers::member::delete_member),
        )
        .route(
            "/api/members/{id}/status",
            put(handlers::member::update_member_status),
        )
        // 线索
        .route(
            "/api/leads",
            get(handlers::lead::list_leads).post(handlers::lead::create_lead),
        )
        .route("/api/leads/summary", get(handlers::lead::lead_summary))
        .route(
            "/api/leads/{id}",
            get(handlers::lead::get_lead)
                .put(handlers::lead::update_lead)
                .delete(handlers::lead::delete_lead),
        )
        .route(
            "/api/leads/{id}/status",
            put(handlers::lead::update_lead_status),
        )
        // 联系人
        .route(
            "/api/contacts",
            get(handlers::contact::list_contacts).post(handlers::contact::create_contact),
        )
        .route(
            "/api/contacts/{id}",
            get(handlers::contact::get_contact)
                .put(handlers::contact::update_contact)
                .delete(handlers::contact::delete_contact),
        )
        // 客户账户
        .route(
            "/api/accounts",
            get(handlers::account::list_accounts).post(handlers::account::create_account),
        )
        .route(
            "/api/accounts/{id}",
            get(handlers::account::get_account)
                .put(handlers::account::update_account)
                .delete(handlers::account::delete_account),
        )
        // 商机
        .route(
            "/api/deals",
            get(handlers::deal::list_deals).post(handlers::deal::create_deal),
        )
        .route("/api/deals/summary", get(handlers::deal::deal_summary))
        .route("/api/deals/stages", get(handlers::deal::deal_stages))
        .route(
            "/api/deals/{id}",
            get(handlers::deal::get_deal)
                .put(handlers::deal::update_deal)
                .delete(handlers::deal::delete_deal),
        )
        // 活动
        .route(
            "/api/activities",
            get(handlers::activity::list_activities).post(handlers::activity::create_activity),
        )
        .route(
            "/api/activities/{id}",
            get(handlers::activity::get_activity)
                .put(handlers::activity::update_activity)
                .delete(handlers::activity::delete_activity),
        );

    // 组合所有路由（后添加的 layer 在外层）
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(tenant_routes)
        .fallback(route_not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_service.clone(),
            crate::auth::middleware::optional_auth_middleware,
        ))
        .layer(axum::middleware::from_fn(
            crate::middleware::error_envelope_middleware,
        ))
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::not_found("Resource")
}
