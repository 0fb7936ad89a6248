//! 认证 API 集成测试

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use crm_service::{models::member::MemberChanges, repository::MemberStore};
use serde_json::json;

mod common;
use common::{create_test_app, login_token, send, send_request, ADMIN_EMAIL, ADMIN_PASSWORD};

#[tokio::test]
async fn test_admin_login_success() {
    let (app, state) = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "Bearer");
    assert_eq!(body["role"], "Admin");
    assert_eq!(body["orgId"], 1);
    assert_eq!(body["memberId"], 1);
    assert_eq!(body["email"], ADMIN_EMAIL);
    assert_eq!(body["orgName"], "Test Organization");

    // 令牌中的声明与响应一致
    let claims = state
        .jwt_service
        .verify(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, ADMIN_EMAIL);
    assert_eq!(claims.org_id, 1);
    assert_eq!(claims.member_id, 1);
    assert_eq!(claims.role, "Admin");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, _) = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": ADMIN_EMAIL, "password": "wrongpass"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());
    assert_eq!(body["message"], "Invalid email or password");
    assert_eq!(body["path"], "/api/auth/login");
}

#[tokio::test]
async fn test_login_unknown_and_suspended_look_the_same() {
    let (app, state) = create_test_app().await;

    let (unknown_status, unknown) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "ghost@test.com", "password": ADMIN_PASSWORD})),
    )
    .await;

    state
        .store
        .update_member(
            1,
            1,
            &MemberChanges {
                status: Some(crm_service::models::member::MemberStatus::Suspended),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let (suspended_status, suspended) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
    )
    .await;

    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(suspended_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown["message"], suspended["message"]);
    assert!(suspended.get("token").is_none());
}

#[tokio::test]
async fn test_login_validation_errors() {
    let (app, _) = create_test_app().await;

    for body in [
        json!({"email": "", "password": "x"}),
        json!({"email": "not-an-email", "password": "x"}),
        json!({"email": ADMIN_EMAIL, "password": ""}),
        json!({}),
    ] {
        let (status, response) =
            send(&app, Method::POST, "/api/auth/login", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["status"], 400);
        assert_eq!(response["error"], "Bad Request");
    }
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let (app, _) = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send_request(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["path"], "/api/auth/login");
    assert!(body["timestamp"].is_string());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_register_then_login() {
    let (app, _) = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "orgName": "Globex",
            "orgEmail": "hq@globex.io",
            "adminName": "Hank Scorpio",
            "adminEmail": "hank@globex.io",
            "adminPassword": "supersecret",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let org_id = body["orgId"].as_i64().unwrap();
    assert_ne!(org_id, 1);

    let (status, login) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "hank@globex.io", "password": "supersecret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["orgId"], org_id);
    assert_eq!(login["role"], "Admin");
    assert_eq!(login["orgName"], "Globex");
}

#[tokio::test]
async fn test_register_rejects_duplicate_admin_email() {
    let (app, _) = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "orgName": "Dup",
            "orgEmail": "hq@dup.io",
            "adminName": "Dup",
            "adminEmail": ADMIN_EMAIL,
            "adminPassword": "supersecret",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn test_register_validates_body() {
    let (app, _) = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "orgName": "  ",
            "orgEmail": "not-an-email",
            "adminName": "A",
            "adminEmail": "a@a.io",
            "adminPassword": "supersecret",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("org_email"));
    assert!(message.contains("org_name"));
}

#[tokio::test]
async fn test_me_requires_identity() {
    let (app, _) = create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);

    let token = login_token(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], ADMIN_EMAIL);
    assert_eq!(body["orgId"], 1);
    assert_eq!(body["role"], "Admin");
}

#[tokio::test]
async fn test_roles_are_public() {
    let (app, _) = create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/roles", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["roleName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Admin", "Manager", "Sales Rep", "User"]);
}
