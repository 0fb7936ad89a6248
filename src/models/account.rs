//! Account (customer company) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "accountId")]
    pub id: i64,
    pub account_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub org_id: i64,
    pub member_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update account request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Account name must not exceed 100 characters")
    )]
    pub account_name: String,

    #[validate(
        email(message = "Account email must be valid"),
        length(max = 100, message = "Email must not exceed 100 characters")
    )]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "Phone must not exceed 20 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Website must not exceed 255 characters"))]
    pub website: Option<String>,

    #[validate(length(max = 100, message = "Industry must not exceed 100 characters"))]
    pub industry: Option<String>,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 255, message = "Address must not exceed 255 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 100, message = "City must not exceed 100 characters"))]
    pub city: Option<String>,

    #[validate(length(max = 100, message = "State must not exceed 100 characters"))]
    pub state: Option<String>,

    #[validate(length(max = 20, message = "Postal code must not exceed 20 characters"))]
    pub postal_code: Option<String>,

    #[validate(length(max = 100, message = "Country must not exceed 100 characters"))]
    pub country: Option<String>,
}
