//! Authentication-related models

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// Login request (format checks happen in the auth service)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub member_id: i64,
    pub email: String,
    pub name: String,
    pub org_id: i64,
    pub org_name: String,
    pub role: String,
}

/// Self-service registration: a new organization plus its first Admin
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Organization name must not exceed 100 characters")
    )]
    pub org_name: String,

    #[validate(
        email(message = "Organization email must be valid"),
        length(max = 100, message = "Organization email must not exceed 100 characters")
    )]
    pub org_email: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Name must not exceed 100 characters")
    )]
    pub admin_name: String,

    #[validate(
        email(message = "Email must be valid"),
        length(max = 100, message = "Email must not exceed 100 characters")
    )]
    pub admin_email: String,

    pub admin_password: String,
}

/// Registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub org_id: i64,
    pub member_id: i64,
}

/// Identity carried by the caller's token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentIdentity {
    pub email: String,
    pub org_id: i64,
    pub member_id: i64,
    pub role: String,
    pub expires_at: i64,
}
