//! HTTP 中间件
//! 应用状态、请求追踪、统一错误响应、请求体校验

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::AppConfig,
    error::{AppError, ErrorResponse},
    repository::CrmStore,
    services::*,
};
use axum::{
    body::Body,
    extract::{FromRequest, Request},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;
use validator::Validate;

/// 错误响应体读取上限
const ERROR_BODY_LIMIT: usize = 64 * 1024;

/// 应用状态
///
/// 所有服务共享同一个存储与同一个 [`JwtService`]，密钥只在启动时构建一次。
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn CrmStore>,
    pub jwt_service: Arc<JwtService>,
    pub password_hasher: Arc<PasswordHasher>,
    pub auth_service: Arc<AuthService>,
    pub member_service: Arc<MemberService>,
    pub organization_service: Arc<OrganizationService>,
    pub lead_service: Arc<LeadService>,
    pub contact_service: Arc<ContactService>,
    pub account_service: Arc<AccountService>,
    pub deal_service: Arc<DealService>,
    pub activity_service: Arc<ActivityService>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn CrmStore>) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::from_config(&config.security)?);
        let password_hasher = Arc::new(PasswordHasher::from_config(&config.security)?);

        let auth_service = Arc::new(AuthService::new(
            store.clone(),
            jwt_service.clone(),
            password_hasher.clone(),
            Arc::new(config.clone()),
        ));
        let member_service = Arc::new(MemberService::new(
            store.clone(),
            password_hasher.clone(),
            config.security.clone(),
        ));

        Ok(Self {
            auth_service,
            member_service,
            organization_service: Arc::new(OrganizationService::new(store.clone())),
            lead_service: Arc::new(LeadService::new(store.clone())),
            contact_service: Arc::new(ContactService::new(store.clone())),
            account_service: Arc::new(AccountService::new(store.clone())),
            deal_service: Arc::new(DealService::new(store.clone())),
            activity_service: Arc::new(ActivityService::new(store.clone())),
            config,
            store,
            jwt_service,
            password_hasher,
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();
        let mut response = next.run(req).await;
        let elapsed = start.elapsed();

        let status = response.status().as_u16();
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            "PATCH" => "PATCH",
            _ => "UNKNOWN",
        };
        let status_code = match status {
            200 => "200",
            201 => "201",
            204 => "204",
            400 => "400",
            401 => "401",
            403 => "403",
            404 => "404",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        // 外部传入的 trace_id 可能不是合法头部值
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// 统一错误响应
///
/// `AppError` 产生的响应回填请求路径；框架自身产生的错误（未知路由、
/// 方法不允许、路径参数解析失败）改写为同样的 JSON 格式。
/// handler 自己返回的 JSON 响应体（如就绪探针的 503）原样保留。
pub async fn error_envelope_middleware(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }
    if response.extensions().get::<ErrorResponse>().is_none() && is_json(response.headers()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let mut envelope = match parts.extensions.remove::<ErrorResponse>() {
        Some(envelope) => envelope,
        None => {
            let message = match axum::body::to_bytes(body, ERROR_BODY_LIMIT).await {
                Ok(bytes) if !bytes.is_empty() => String::from_utf8_lossy(&bytes).into_owned(),
                _ => status.canonical_reason().unwrap_or("Error").to_string(),
            };
            ErrorResponse::new(status, message)
        }
    };
    envelope.path = path;

    let bytes = match serde_json::to_vec(&envelope) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode error response");
            return Response::from_parts(parts, Body::empty());
        }
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Response::from_parts(parts, Body::from(bytes))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// 反序列化后立即执行 `validator` 校验的 JSON 提取器
///
/// JSON 语法或字段类型错误与校验失败都以 400 返回。
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}
