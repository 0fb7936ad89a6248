//! Organization repository

use crate::{
    error::AppError,
    models::organization::{Organization, OrganizationRequest},
};
use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryStore, PgStore};

#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn create_organization(
        &self,
        org_name: &str,
        org_email: &str,
    ) -> Result<Organization, AppError>;

    async fn find_organization(&self, id: i64) -> Result<Option<Organization>, AppError>;

    async fn find_organization_by_email(
        &self,
        org_email: &str,
    ) -> Result<Option<Organization>, AppError>;

    async fn update_organization(
        &self,
        id: i64,
        req: &OrganizationRequest,
    ) -> Result<Option<Organization>, AppError>;

    /// Removes the organization and everything it owns
    async fn delete_organization(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
impl OrganizationStore for PgStore {
    async fn create_organization(
        &self,
        org_name: &str,
        org_email: &str,
    ) -> Result<Organization, AppError> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (org_name, org_email)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(org_name)
        .bind(org_email)
        .fetch_one(&self.db)
        .await?;

        Ok(org)
    }

    async fn find_organization(&self, id: i64) -> Result<Option<Organization>, AppError> {
        let org = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(org)
    }

    async fn find_organization_by_email(
        &self,
        org_email: &str,
    ) -> Result<Option<Organization>, AppError> {
        let org =
            sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE org_email = $1")
                .bind(org_email)
                .fetch_optional(&self.db)
                .await?;

        Ok(org)
    }

    async fn update_organization(
        &self,
        id: i64,
        req: &OrganizationRequest,
    ) -> Result<Option<Organization>, AppError> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            UPDATE organizations
            SET org_name = $2, org_email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.org_name)
        .bind(&req.org_email)
        .fetch_optional(&self.db)
        .await?;

        Ok(org)
    }

    async fn delete_organization(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OrganizationStore for MemoryStore {
    async fn create_organization(
        &self,
        org_name: &str,
        org_email: &str,
    ) -> Result<Organization, AppError> {
        let mut tables = self.tables.write().await;
        if tables.organizations.values().any(|o| o.org_email == org_email) {
            return Err(AppError::bad_request("Organization email already exists"));
        }

        let now = Utc::now();
        let id = tables.organizations.allocate_id();
        Ok(tables.organizations.insert(
            id,
            Organization {
                id,
                org_name: org_name.to_string(),
                org_email: org_email.to_string(),
                created_at: now,
                updated_at: now,
            },
        ))
    }

    async fn find_organization(&self, id: i64) -> Result<Option<Organization>, AppError> {
        Ok(self.tables.read().await.organizations.get(id).cloned())
    }

    async fn find_organization_by_email(
        &self,
        org_email: &str,
    ) -> Result<Option<Organization>, AppError> {
        let tables = self.tables.read().await;
        let found = tables
            .organizations
            .values()
            .find(|o| o.org_email == org_email)
            .cloned();
        Ok(found)
    }

    async fn update_organization(
        &self,
        id: i64,
        req: &OrganizationRequest,
    ) -> Result<Option<Organization>, AppError> {
        let mut tables = self.tables.write().await;
        if tables
            .organizations
            .values()
            .any(|o| o.id != id && o.org_email == req.org_email)
        {
            return Err(AppError::bad_request("Organization email already exists"));
        }

        Ok(tables.organizations.get_mut(id).map(|org| {
            org.org_name = req.org_name.clone();
            org.org_email = req.org_email.clone();
            org.updated_at = Utc::now();
            org.clone()
        }))
    }

    async fn delete_organization(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.drop_organization(id))
    }
}
