//! 组织服务
//! 调用方只能看到自己所在的组织

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    models::{
        organization::{Organization, OrganizationRequest},
        role::ADMIN,
    },
    repository::{CrmStore, OrganizationStore},
};
use std::sync::Arc;

pub struct OrganizationService {
    store: Arc<dyn CrmStore>,
}

impl OrganizationService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, scope: &TenantScope) -> Result<Vec<Organization>, AppError> {
        Ok(self
            .store
            .find_organization(scope.organization_id())
            .await?
            .into_iter()
            .collect())
    }

    pub async fn get(&self, scope: &TenantScope, id: i64) -> Result<Organization, AppError> {
        if id != scope.organization_id() {
            return Err(AppError::not_found("Organization"));
        }
        self.store
            .find_organization(id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization"))
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: i64,
        req: &OrganizationRequest,
    ) -> Result<Organization, AppError> {
        self.get(scope, id).await?;
        scope.require_any_role(&[ADMIN])?;

        let req = OrganizationRequest {
            org_name: req.org_name.trim().to_string(),
            org_email: req.org_email.trim().to_string(),
        };
        if let Some(existing) = self.store.find_organization_by_email(&req.org_email).await? {
            if existing.id != id {
                return Err(AppError::bad_request("Organization email already exists"));
            }
        }

        let org = self
            .store
            .update_organization(id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Organization"))?;
        tracing::info!(org_id = id, "Organization updated");
        Ok(org)
    }

    /// 删除组织及其全部成员与业务记录
    pub async fn delete(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        self.get(scope, id).await?;
        scope.require_any_role(&[ADMIN])?;

        if !self.store.delete_organization(id).await? {
            return Err(AppError::not_found("Organization"));
        }
        tracing::warn!(org_id = id, deleted_by = scope.member_id(), "Organization deleted");
        Ok(())
    }
}
