//! Account repository

use crate::{
    error::AppError,
    models::account::{Account, AccountRequest},
};
use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryStore, PgStore};

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_account(
        &self,
        org_id: i64,
        member_id: i64,
        req: &AccountRequest,
    ) -> Result<Account, AppError>;

    async fn list_accounts(&self, org_id: i64) -> Result<Vec<Account>, AppError>;

    async fn find_account(&self, org_id: i64, id: i64) -> Result<Option<Account>, AppError>;

    /// Account emails are unique within one organization
    async fn find_account_by_email(
        &self,
        org_id: i64,
        email: &str,
    ) -> Result<Option<Account>, AppError>;

    async fn update_account(
        &self,
        org_id: i64,
        id: i64,
        req: &AccountRequest,
    ) -> Result<Option<Account>, AppError>;

    async fn delete_account(&self, org_id: i64, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_account(
        &self,
        org_id: i64,
        member_id: i64,
        req: &AccountRequest,
    ) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (
                account_name, email, phone, website, industry, description,
                address, city, state, postal_code, country, org_id, member_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&req.account_name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.website)
        .bind(&req.industry)
        .bind(&req.description)
        .bind(&req.address)
        .bind(&req.city)
        .bind(&req.state)
        .bind(&req.postal_code)
        .bind(&req.country)
        .bind(org_id)
        .bind(member_id)
        .fetch_one(&self.db)
        .await?;

        Ok(account)
    }

    async fn list_accounts(&self, org_id: i64) -> Result<Vec<Account>, AppError> {
        let accounts =
            sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE org_id = $1 ORDER BY id")
                .bind(org_id)
                .fetch_all(&self.db)
                .await?;

        Ok(accounts)
    }

    async fn find_account(&self, org_id: i64, id: i64) -> Result<Option<Account>, AppError> {
        let account =
            sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1 AND org_id = $2")
                .bind(id)
                .bind(org_id)
                .fetch_optional(&self.db)
                .await?;

        Ok(account)
    }

    async fn find_account_by_email(
        &self,
        org_id: i64,
        email: &str,
    ) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE org_id = $1 AND email = $2",
        )
        .bind(org_id)
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(account)
    }

    async fn update_account(
        &self,
        org_id: i64,
        id: i64,
        req: &AccountRequest,
    ) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET
                account_name = $3, email = $4, phone = $5, website = $6, industry = $7,
                description = $8, address = $9, city = $10, state = $11,
                postal_code = $12, country = $13, updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(&req.account_name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.website)
        .bind(&req.industry)
        .bind(&req.description)
        .bind(&req.address)
        .bind(&req.city)
        .bind(&req.state)
        .bind(&req.postal_code)
        .bind(&req.country)
        .fetch_optional(&self.db)
        .await?;

        Ok(account)
    }

    async fn delete_account(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(org_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn apply(account: &mut Account, req: &AccountRequest) {
    account.account_name = req.account_name.clone();
    account.email = req.email.clone();
    account.phone = req.phone.clone();
    account.website = req.website.clone();
    account.industry = req.industry.clone();
    account.description = req.description.clone();
    account.address = req.address.clone();
    account.city = req.city.clone();
    account.state = req.state.clone();
    account.postal_code = req.postal_code.clone();
    account.country = req.country.clone();
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(
        &self,
        org_id: i64,
        member_id: i64,
        req: &AccountRequest,
    ) -> Result<Account, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = tables.accounts.allocate_id();
        let mut account = Account {
            id,
            account_name: String::new(),
            email: None,
            phone: None,
            website: None,
            industry: None,
            description: None,
            address: None,
            city: None,
            state: None,
            postal_code: None,
            country: None,
            org_id,
            member_id,
            created_at: now,
            updated_at: now,
        };
        apply(&mut account, req);
        Ok(tables.accounts.insert(id, account))
    }

    async fn list_accounts(&self, org_id: i64) -> Result<Vec<Account>, AppError> {
        Ok(self.tables.read().await.accounts.list_owned(org_id))
    }

    async fn find_account(&self, org_id: i64, id: i64) -> Result<Option<Account>, AppError> {
        Ok(self.tables.read().await.accounts.owned(org_id, id).cloned())
    }

    async fn find_account_by_email(
        &self,
        org_id: i64,
        email: &str,
    ) -> Result<Option<Account>, AppError> {
        let tables = self.tables.read().await;
        let found = tables
            .accounts
            .values()
            .find(|a| a.org_id == org_id && a.email.as_deref() == Some(email))
            .cloned();
        Ok(found)
    }

    async fn update_account(
        &self,
        org_id: i64,
        id: i64,
        req: &AccountRequest,
    ) -> Result<Option<Account>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.accounts.owned_mut(org_id, id).map(|account| {
            apply(account, req);
            account.updated_at = Utc::now();
            account.clone()
        }))
    }

    async fn delete_account(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.owned(org_id, id).is_none() {
            return Ok(false);
        }
        Ok(tables.drop_account(id))
    }
}
