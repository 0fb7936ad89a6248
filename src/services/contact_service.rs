//! 联系人服务

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    models::contact::{Contact, ContactRequest},
    repository::{ContactStore, CrmStore},
    services::ensure_account,
};
use std::sync::Arc;

pub struct ContactService {
    store: Arc<dyn CrmStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        scope: &TenantScope,
        req: &ContactRequest,
    ) -> Result<Contact, AppError> {
        let org_id = scope.organization_id();
        ensure_account(self.store.as_ref(), org_id, req.account_id).await?;

        let contact = self
            .store
            .create_contact(org_id, scope.member_id(), req)
            .await?;
        tracing::info!(contact_id = contact.id, org_id, "Contact created");
        Ok(contact)
    }

    pub async fn list(&self, scope: &TenantScope) -> Result<Vec<Contact>, AppError> {
        self.store.list_contacts(scope.organization_id()).await
    }

    pub async fn get(&self, scope: &TenantScope, id: i64) -> Result<Contact, AppError> {
        self.store
            .find_contact(scope.organization_id(), id)
            .await?
            .ok_or_else(|| AppError::not_found("Contact"))
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: i64,
        req: &ContactRequest,
    ) -> Result<Contact, AppError> {
        let org_id = scope.organization_id();
        // 先确认目标存在，避免用引用错误掩盖 404
        self.get(scope, id).await?;
        ensure_account(self.store.as_ref(), org_id, req.account_id).await?;

        self.store
            .update_contact(org_id, id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Contact"))
    }

    pub async fn delete(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        if !self
            .store
            .delete_contact(scope.organization_id(), id)
            .await?
        {
            return Err(AppError::not_found("Contact"));
        }
        tracing::info!(contact_id = id, "Contact deleted");
        Ok(())
    }
}
