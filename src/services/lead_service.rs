//! 线索服务

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    models::{
        lead::{Lead, LeadRequest},
        role::PIPELINE_ROLES,
        MonthlyCount,
    },
    repository::{CrmStore, LeadStore},
};
use std::sync::Arc;

pub struct LeadService {
    store: Arc<dyn CrmStore>,
}

impl LeadService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, scope: &TenantScope, req: &LeadRequest) -> Result<Lead, AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;

        let lead = self
            .store
            .create_lead(scope.organization_id(), scope.member_id(), req)
            .await?;

        tracing::info!(lead_id = lead.id, org_id = lead.org_id, "Lead created");
        Ok(lead)
    }

    pub async fn list(&self, scope: &TenantScope) -> Result<Vec<Lead>, AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        self.store.list_leads(scope.organization_id()).await
    }

    pub async fn get(&self, scope: &TenantScope, id: i64) -> Result<Lead, AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        self.store
            .find_lead(scope.organization_id(), id)
            .await?
            .ok_or_else(|| AppError::not_found("Lead"))
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: i64,
        req: &LeadRequest,
    ) -> Result<Lead, AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        self.store
            .update_lead(scope.organization_id(), id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Lead"))
    }

    /// 设置线索验证状态
    pub async fn set_verified(
        &self,
        scope: &TenantScope,
        id: i64,
        is_verified: bool,
    ) -> Result<Lead, AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        let lead = self
            .store
            .set_lead_verified(scope.organization_id(), id, is_verified)
            .await?
            .ok_or_else(|| AppError::not_found("Lead"))?;

        tracing::info!(lead_id = lead.id, is_verified, "Lead verification changed");
        Ok(lead)
    }

    pub async fn delete(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        if !self.store.delete_lead(scope.organization_id(), id).await? {
            return Err(AppError::not_found("Lead"));
        }
        tracing::info!(lead_id = id, "Lead deleted");
        Ok(())
    }

    /// 按月统计线索数量
    pub async fn monthly_summary(&self, scope: &TenantScope) -> Result<Vec<MonthlyCount>, AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        self.store.lead_monthly_counts(scope.organization_id()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::*;
    use chrono::{Datelike, Utc};

    fn request(name: &str) -> LeadRequest {
        LeadRequest {
            lead_name: name.to_string(),
            lead_email: format!("{}@lead.io", name.to_lowercase()),
            phone: None,
            is_verified: None,
        }
    }

    #[tokio::test]
    async fn test_create_stamps_scope() {
        let service = LeadService::new(seeded_store().await);
        let lead = service
            .create(&scope(1, 1, "Sales Rep"), &request("Jane"))
            .await
            .unwrap();

        assert_eq!(lead.org_id, 1);
        assert_eq!(lead.member_id, 1);
        assert!(!lead.is_verified);
    }

    #[tokio::test]
    async fn test_other_org_sees_not_found() {
        let store = seeded_store().await;
        let other = second_org(store.as_ref()).await;
        let service = LeadService::new(store);

        let lead = service
            .create(&scope(1, 1, "Admin"), &request("Jane"))
            .await
            .unwrap();
        let outsider = scope(other.id, 99, "Admin");

        assert!(service.list(&outsider).await.unwrap().is_empty());
        assert!(matches!(
            service.get(&outsider, lead.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&outsider, lead.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(service.get(&scope(1, 1, "Admin"), lead.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_user_role_is_forbidden() {
        let service = LeadService::new(seeded_store().await);
        let result = service.list(&scope(1, 1, "User")).await;
        assert!(matches!(result, Err(AppError::Forbidden)));

        // 匿名回退请求不带角色
        assert!(service.list(&anonymous()).await.is_ok());
    }

    #[tokio::test]
    async fn test_verification_and_summary() {
        let service = LeadService::new(seeded_store().await);
        let caller = scope(1, 1, "Manager");

        let lead = service.create(&caller, &request("Jane")).await.unwrap();
        service.create(&caller, &request("John")).await.unwrap();

        let verified = service.set_verified(&caller, lead.id, true).await.unwrap();
        assert!(verified.is_verified);

        let summary = service.monthly_summary(&caller).await.unwrap();
        let now = Utc::now();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].year, now.year());
        assert_eq!(summary[0].month, now.month() as i32);
        assert_eq!(summary[0].count, 2);
    }
}
