//! Activity (call, meeting, task) models

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{not_blank, wire_datetime};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "activityId")]
    pub id: i64,
    pub activity_type: String,
    pub subject: String,
    pub description: Option<String>,
    #[serde(with = "wire_datetime")]
    pub activity_date: NaiveDateTime,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub org_id: i64,
    pub member_id: i64,
    pub lead_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub account_id: Option<i64>,
    pub deal_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update activity request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "Activity type must not exceed 50 characters")
    )]
    pub activity_type: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Activity subject must not exceed 200 characters")
    )]
    pub subject: String,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    #[serde(with = "wire_datetime")]
    pub activity_date: NaiveDateTime,

    #[validate(length(max = 50, message = "Status must not exceed 50 characters"))]
    pub status: Option<String>,

    #[validate(length(max = 50, message = "Priority must not exceed 50 characters"))]
    pub priority: Option<String>,

    pub lead_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub account_id: Option<i64>,
    pub deal_id: Option<i64>,
}
