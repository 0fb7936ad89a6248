//! Lead models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// Sales lead
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(rename = "leadId")]
    pub id: i64,
    pub lead_name: String,
    pub lead_email: String,
    pub phone: Option<String>,
    pub is_verified: bool,
    pub org_id: i64,
    pub member_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update lead request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Lead name must not exceed 100 characters")
    )]
    pub lead_name: String,

    #[validate(
        email(message = "Lead email must be valid"),
        length(max = 100, message = "Lead email must not exceed 100 characters")
    )]
    pub lead_email: String,

    #[validate(length(max = 20, message = "Phone must not exceed 20 characters"))]
    pub phone: Option<String>,

    pub is_verified: Option<bool>,
}

/// `PUT /api/leads/{id}/status?isVerified=`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStatusQuery {
    pub is_verified: bool,
}
