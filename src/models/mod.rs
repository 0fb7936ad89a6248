//! 数据模型模块
//! 组织、角色、成员与各类 CRM 记录，外加共享的序列化与校验工具

pub mod account;
pub mod activity;
pub mod auth;
pub mod contact;
pub mod deal;
pub mod lead;
pub mod member;
pub mod organization;
pub mod role;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::ValidationError;

/// 业务时间的线上格式（活动时间、成交日期等）
pub const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `yyyy-MM-dd HH:mm:ss` 格式的 NaiveDateTime 序列化
pub mod wire_datetime {
    use super::WIRE_DATETIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(WIRE_DATETIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, WIRE_DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// 可选字段版本
pub mod wire_datetime_opt {
    use super::WIRE_DATETIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&v.format(WIRE_DATETIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => {
                NaiveDateTime::parse_from_str(&raw, WIRE_DATETIME_FORMAT)
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

/// 按月统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MonthlyCount {
    pub year: i32,
    pub month: i32,
    pub count: i64,
}

/// 按阶段统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StageCount {
    pub stage: String,
    pub count: i64,
}

/// 必填文本：去除空白后不能为空
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// 金额列为 NUMERIC(15, 2)，整数部分最多 13 位
const AMOUNT_LIMIT: i64 = 10_000_000_000_000;

/// 金额必须大于 0，且保留两位小数后能存入金额列
pub fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive");
        error.message = Some("must be greater than 0".into());
        return Err(error);
    }
    if value.round_dp(2) >= Decimal::from(AMOUNT_LIMIT) {
        let mut error = ValidationError::new("max");
        error.message = Some(format!("must be less than {}", AMOUNT_LIMIT).into());
        return Err(error);
    }
    Ok(())
}

/// 去掉首尾空白，空串视为未填写
pub fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
