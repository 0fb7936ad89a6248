//! Organization (tenant) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// Organization. Every other record is owned by exactly one of these.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(rename = "orgId")]
    pub id: i64,
    pub org_name: String,
    pub org_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Update organization request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRequest {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_request_validation() {
        let valid = OrganizationRequest {
            org_name: "Acme".to_string(),
            org_email: "ops@acme.io".to_string(),
        };
        assert!(valid.validate().is_ok());

        let blank = OrganizationRequest {
            org_name: "  ".to_string(),
            ..valid.clone()
        };
        assert!(blank.validate().is_err());

        let bad_email = OrganizationRequest {
            org_email: "not-an-email".to_string(),
            ..valid
        };
        assert!(bad_email.validate().is_err());
    }
}
