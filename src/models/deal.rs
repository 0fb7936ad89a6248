//! Deal (sales opportunity) models

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{not_blank, positive_amount, wire_datetime_opt};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    #[serde(rename = "dealId")]
    pub id: i64,
    pub deal_name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub deal_value: Decimal,
    pub deal_stage: String,
    #[serde(default, with = "wire_datetime_opt")]
    pub expected_close_date: Option<NaiveDateTime>,
    #[serde(default, with = "wire_datetime_opt")]
    pub actual_close_date: Option<NaiveDateTime>,
    pub probability: Option<String>,
    pub org_id: i64,
    pub member_id: i64,
    pub account_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update deal request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DealRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Deal name must not exceed 100 characters")
    )]
    pub deal_name: String,

    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "positive_amount"))]
    pub deal_value: Decimal,

    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "Deal stage must not exceed 50 characters")
    )]
    pub deal_stage: String,

    #[serde(default, with = "wire_datetime_opt")]
    pub expected_close_date: Option<NaiveDateTime>,

    #[serde(default, with = "wire_datetime_opt")]
    pub actual_close_date: Option<NaiveDateTime>,

    #[validate(length(max = 100, message = "Probability must not exceed 100 characters"))]
    pub probability: Option<String>,

    pub account_id: Option<i64>,

    pub contact_id: Option<i64>,
}
