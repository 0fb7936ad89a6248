//! Role domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ADMIN: &str = "Admin";
pub const MANAGER: &str = "Manager";
pub const SALES_REP: &str = "Sales Rep";
pub const USER: &str = "User";

/// Roles created at startup when missing, in id order
pub const SEEDED_ROLES: [&str; 4] = [ADMIN, MANAGER, SALES_REP, USER];

/// Roles allowed to work the sales pipeline (leads and deals)
pub const PIPELINE_ROLES: [&str; 3] = [ADMIN, MANAGER, SALES_REP];

/// Role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(rename = "roleId")]
    pub id: i64,
    pub role_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
