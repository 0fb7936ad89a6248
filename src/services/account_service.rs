//! 客户账户服务

use crate::{
    auth::tenant::TenantScope,
    error::AppError,
    models::{
        account::{Account, AccountRequest},
        trimmed,
    },
    repository::{AccountStore, CrmStore},
};
use std::sync::Arc;

pub struct AccountService {
    store: Arc<dyn CrmStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        scope: &TenantScope,
        req: &AccountRequest,
    ) -> Result<Account, AppError> {
        let org_id = scope.organization_id();
        let req = normalize(req);
        self.ensure_email_available(org_id, req.email.as_deref(), None)
            .await?;

        let account = self
            .store
            .create_account(org_id, scope.member_id(), &req)
            .await?;
        tracing::info!(account_id = account.id, org_id, "Account created");
        Ok(account)
    }

    pub async fn list(&self, scope: &TenantScope) -> Result<Vec<Account>, AppError> {
        self.store.list_accounts(scope.organization_id()).await
    }

    pub async fn get(&self, scope: &TenantScope, id: i64) -> Result<Account, AppError> {
        self.store
            .find_account(scope.organization_id(), id)
            .await?
            .ok_or_else(|| AppError::not_found("Account"))
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: i64,
        req: &AccountRequest,
    ) -> Result<Account, AppError> {
        let org_id = scope.organization_id();
        self.get(scope, id).await?;

        let req = normalize(req);
        self.ensure_email_available(org_id, req.email.as_deref(), Some(id))
            .await?;

        self.store
            .update_account(org_id, id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Account"))
    }

    /// 删除账户；引用它的联系人、商机、活动保留，引用置空
    pub async fn delete(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        if !self
            .store
            .delete_account(scope.organization_id(), id)
            .await?
        {
            return Err(AppError::not_found("Account"));
        }
        tracing::info!(account_id = id, "Account deleted");
        Ok(())
    }

    /// 同一组织内账户邮箱唯一
    async fn ensure_email_available(
        &self,
        org_id: i64,
        email: Option<&str>,
        current: Option<i64>,
    ) -> Result<(), AppError> {
        let Some(email) = email else {
            return Ok(());
        };

        match self.store.find_account_by_email(org_id, email).await? {
            Some(existing) if Some(existing.id) != current => {
                Err(AppError::bad_request("Account email already exists"))
            }
            _ => Ok(()),
        }
    }
}

fn normalize(req: &AccountRequest) -> AccountRequest {
    AccountRequest {
        email: trimmed(&req.email),
        ..req.clone()
    }
}
