//! 活动（通话、会议、任务等）服务

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    models::activity::{Activity, ActivityRequest},
    repository::{ActivityStore, CrmStore},
    services::{ensure_account, ensure_contact, ensure_deal, ensure_lead},
};
use std::sync::Arc;

pub struct ActivityService {
    store: Arc<dyn CrmStore>,
}

impl ActivityService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        scope: &TenantScope,
        req: &ActivityRequest,
    ) -> Result<Activity, AppError> {
        let org_id = scope.organization_id();
        self.check_references(org_id, req).await?;

        let activity = self
            .store
            .create_activity(org_id, scope.member_id(), req)
            .await?;
        tracing::info!(
            activity_id = activity.id,
            org_id,
            activity_type = %activity.activity_type,
            "Activity created"
        );
        Ok(activity)
    }

    /// 最新的活动排在前面
    pub async fn list(&self, scope: &TenantScope) -> Result<Vec<Activity>, AppError> {
        self.store.list_activities(scope.organization_id()).await
    }

    pub async fn get(&self, scope: &TenantScope, id: i64) -> Result<Activity, AppError> {
        self.store
            .find_activity(scope.organization_id(), id)
            .await?
            .ok_or_else(|| AppError::not_found("Activity"))
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: i64,
        req: &ActivityRequest,
    ) -> Result<Activity, AppError> {
        let org_id = scope.organization_id();
        self.get(scope, id).await?;
        self.check_references(org_id, req).await?;

        self.store
            .update_activity(org_id, id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Activity"))
    }

    pub async fn delete(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        if !self
            .store
            .delete_activity(scope.organization_id(), id)
            .await?
        {
            return Err(AppError::not_found("Activity"));
        }
        tracing::info!(activity_id = id, "Activity deleted");
        Ok(())
    }

    async fn check_references(&self, org_id: i64, req: &ActivityRequest) -> Result<(), AppError> {
        let store = self.store.as_ref();
        ensure_lead(store, org_id, req.lead_id).await?;
        ensure_contact(store, org_id, req.contact_id).await?;
        ensure_account(store, org_id, req.account_id).await?;
        ensure_deal(store, org_id, req.deal_id).await
    }
}
