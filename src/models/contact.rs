//! Contact models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// Contact person, optionally attached to an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "contactId")]
    pub id: i64,
    pub contact_name: String,
    pub contact_email: String,
    pub phone: Option<String>,
    pub org_id: i64,
    pub member_id: i64,
    pub account_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update contact request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Contact name must not exceed 100 characters")
    )]
    pub contact_name: String,

    #[validate(
        email(message = "Contact email must be valid"),
        length(max = 100, message = "Contact email must not exceed 100 characters")
    )]
    pub contact_email: String,

    #[validate(length(max = 20, message = "Phone must not exceed 20 characters"))]
    pub phone: Option<String>,

    pub account_id: Option<i64>,
}
