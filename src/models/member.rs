//! Member domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::Validate;

use super::not_blank;

/// Member account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,

    // Account state
    pub status: String, // ACTIVE, INACTIVE, SUSPENDED

    pub org_id: i64,
    pub role_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn status(&self) -> MemberStatus {
        self.status.parse().unwrap_or(MemberStatus::Inactive)
    }
}

/// Member status. Any transition is allowed; only ACTIVE may log in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberStatus {
    Active,
    Inactive,
    Suspended,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "ACTIVE",
            MemberStatus::Inactive => "INACTIVE",
            MemberStatus::Suspended => "SUSPENDED",
        }
    }

    pub fn can_login(&self) -> bool {
        matches!(self, MemberStatus::Active)
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(MemberStatus::Active),
            "INACTIVE" => Ok(MemberStatus::Inactive),
            "SUSPENDED" => Ok(MemberStatus::Suspended),
            other => Err(format!("Unknown member status: {}", other)),
        }
    }
}

/// Everything login needs, read in one fetch: the member joined with its
/// organization name and role name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CredentialRecord {
    pub member_id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub status: String,
    pub org_id: i64,
    pub org_name: String,
    pub role_name: String,
}

/// Fields written when a member row is inserted
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub status: MemberStatus,
    pub org_id: i64,
    pub role_id: i64,
}

/// Partial member update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct MemberChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub status: Option<MemberStatus>,
    pub role_id: Option<i64>,
}

/// Create member request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Name must not exceed 100 characters")
    )]
    pub name: String,

    #[validate(
        email(message = "Email must be valid"),
        length(max = 100, message = "Email must not exceed 100 characters")
    )]
    pub email: String,

    pub password: String,

    pub role_id: i64,

    pub status: Option<MemberStatus>,
}

/// Update member request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Name must not exceed 100 characters")
    )]
    pub name: Option<String>,

    #[validate(
        email(message = "Email must be valid"),
        length(max = 100, message = "Email must not exceed 100 characters")
    )]
    pub email: Option<String>,

    pub password: Option<String>,

    pub role_id: Option<i64>,

    pub status: Option<MemberStatus>,
}

/// Status change request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MemberStatusRequest {
    pub status: MemberStatus,
}

/// Member response (without sensitive data)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub member_id: i64,
    pub name: String,
    pub email: String,
    pub status: String,
    pub org_id: i64,
    pub role_id: i64,
    pub role_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemberResponse {
    pub fn new(member: Member, role_name: Option<String>) -> Self {
        Self {
            member_id: member.id,
            name: member.name,
            email: member.email,
            status: member.status,
            org_id: member.org_id,
            role_id: member.role_id,
            role_name,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}
