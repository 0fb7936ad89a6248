//! 商机服务

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    models::{
        deal::{Deal, DealRequest},
        role::PIPELINE_ROLES,
        MonthlyCount, StageCount,
    },
    repository::{CrmStore, DealStore},
    services::{ensure_account, ensure_contact},
};
use std::sync::Arc;

pub struct DealService {
    store: Arc<dyn CrmStore>,
}

impl DealService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, scope: &TenantScope, req: &DealRequest) -> Result<Deal, AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        let org_id = scope.organization_id();
        self.check_references(org_id, req).await?;

        let deal = self
            .store
            .create_deal(org_id, scope.member_id(), req)
            .await?;
        tracing::info!(
            deal_id = deal.id,
            org_id,
            stage = %deal.deal_stage,
            "Deal created"
        );
        Ok(deal)
    }

    pub async fn list(&self, scope: &TenantScope) -> Result<Vec<Deal>, AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        self.store.list_deals(scope.organization_id()).await
    }

    pub async fn get(&self, scope: &TenantScope, id: i64) -> Result<Deal, AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        self.store
            .find_deal(scope.organization_id(), id)
            .await?
            .ok_or_else(|| AppError::not_found("Deal"))
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: i64,
        req: &DealRequest,
    ) -> Result<Deal, AppError> {
        let org_id = scope.organization_id();
        self.get(scope, id).await?;
        self.check_references(org_id, req).await?;

        self.store
            .update_deal(org_id, id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Deal"))
    }

    pub async fn delete(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        if !self.store.delete_deal(scope.organization_id(), id).await? {
            return Err(AppError::not_found("Deal"));
        }
        tracing::info!(deal_id = id, "Deal deleted");
        Ok(())
    }

    /// 按月统计商机数量
    pub async fn monthly_summary(&self, scope: &TenantScope) -> Result<Vec<MonthlyCount>, AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        self.store.deal_monthly_counts(scope.organization_id()).await
    }

    /// 各阶段商机数量
    pub async fn stage_summary(&self, scope: &TenantScope) -> Result<Vec<StageCount>, AppError> {
        scope.require_any_role(&PIPELINE_ROLES)?;
        self.store.deal_stage_counts(scope.organization_id()).await
    }

    async fn check_references(&self, org_id: i64, req: &DealRequest) -> Result<(), AppError> {
        ensure_account(self.store.as_ref(), org_id, req.account_id).await?;
        ensure_contact(self.store.as_ref(), org_id, req.contact_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::*;
    use rust_decimal::Decimal;

    fn request(name: &str, stage: &str) -> DealRequest {
        DealRequest {
            deal_name: name.to_string(),
            description: None,
            deal_value: Decimal::new(250_000, 2),
            deal_stage: stage.to_string(),
            expected_close_date: None,
            actual_close_date: None,
            probability: Some("60%".to_string()),
            account_id: None,
            contact_id: None,
        }
    }

    #[tokio::test]
    async fn test_stage_counts_ordered_by_stage() {
        let service = DealService::new(seeded_store().await);
        let caller = scope(1, 1, "Sales Rep");

        for (name, stage) in [("A", "Proposal"), ("B", "Closed Won"), ("C", "Proposal")] {
            service.create(&caller, &request(name, stage)).await.unwrap();
        }

        let stages = service.stage_summary(&caller).await.unwrap();
        let flat: Vec<(&str, i64)> = stages.iter().map(|s| (s.stage.as_str(), s.count)).collect();
        assert_eq!(flat, vec![("Closed Won", 1), ("Proposal", 2)]);

        let monthly = service.monthly_summary(&caller).await.unwrap();
        assert_eq!(monthly.iter().map(|m| m.count).sum::<i64>(), 3);
    }

    #[tokio::test]
    async fn test_unknown_contact_reference_rejected() {
        let service = DealService::new(seeded_store().await);
        let req = DealRequest {
            contact_id: Some(777),
            ..request("A", "Proposal")
        };

        let result = service.create(&scope(1, 1, "Admin"), &req).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_user_role_cannot_read_deals() {
        let service = DealService::new(seeded_store().await);
        assert!(matches!(
            service.stage_summary(&scope(1, 1, "User")).await,
            Err(AppError::Forbidden)
        ));
    }
}
