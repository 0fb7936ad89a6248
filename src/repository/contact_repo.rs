//! Contact repository

use crate::{
    error::AppError,
    models::contact::{Contact, ContactRequest},
};
use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryStore, PgStore};

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn create_contact(
        &self,
        org_id: i64,
        member_id: i64,
        req: &ContactRequest,
    ) -> Result<Contact, AppError>;

    async fn list_contacts(&self, org_id: i64) -> Result<Vec<Contact>, AppError>;

    async fn find_contact(&self, org_id: i64, id: i64) -> Result<Option<Contact>, AppError>;

    async fn update_contact(
        &self,
        org_id: i64,
        id: i64,
        req: &ContactRequest,
    ) -> Result<Option<Contact>, AppError>;

    async fn delete_contact(&self, org_id: i64, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
impl ContactStore for PgStore {
    async fn create_contact(
        &self,
        org_id: i64,
        member_id: i64,
        req: &ContactRequest,
    ) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (contact_name, contact_email, phone, account_id, org_id, member_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&req.contact_name)
        .bind(&req.contact_email)
        .bind(&req.phone)
        .bind(req.account_id)
        .bind(org_id)
        .bind(member_id)
        .fetch_one(&self.db)
        .await?;

        Ok(contact)
    }

    async fn list_contacts(&self, org_id: i64) -> Result<Vec<Contact>, AppError> {
        let contacts =
            sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE org_id = $1 ORDER BY id")
                .bind(org_id)
                .fetch_all(&self.db)
                .await?;

        Ok(contacts)
    }

    async fn find_contact(&self, org_id: i64, id: i64) -> Result<Option<Contact>, AppError> {
        let contact =
            sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1 AND org_id = $2")
                .bind(id)
                .bind(org_id)
                .fetch_optional(&self.db)
                .await?;

        Ok(contact)
    }

    async fn update_contact(
        &self,
        org_id: i64,
        id: i64,
        req: &ContactRequest,
    ) -> Result<Option<Contact>, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET contact_name = $3, contact_email = $4, phone = $5, account_id = $6,
                updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(&req.contact_name)
        .bind(&req.contact_email)
        .bind(&req.phone)
        .bind(req.account_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(contact)
    }

    async fn delete_contact(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(org_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn create_contact(
        &self,
        org_id: i64,
        member_id: i64,
        req: &ContactRequest,
    ) -> Result<Contact, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = tables.contacts.allocate_id();
        Ok(tables.contacts.insert(
            id,
            Contact {
                id,
                contact_name: req.contact_name.clone(),
                contact_email: req.contact_email.clone(),
                phone: req.phone.clone(),
                org_id,
                member_id,
                account_id: req.account_id,
                created_at: now,
                updated_at: now,
            },
        ))
    }

    async fn list_contacts(&self, org_id: i64) -> Result<Vec<Contact>, AppError> {
        Ok(self.tables.read().await.contacts.list_owned(org_id))
    }

    async fn find_contact(&self, org_id: i64, id: i64) -> Result<Option<Contact>, AppError> {
        Ok(self.tables.read().await.contacts.owned(org_id, id).cloned())
    }

    async fn update_contact(
        &self,
        org_id: i64,
        id: i64,
        req: &ContactRequest,
    ) -> Result<Option<Contact>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.contacts.owned_mut(org_id, id).map(|contact| {
            contact.contact_name = req.contact_name.clone();
            contact.contact_email = req.contact_email.clone();
            contact.phone = req.phone.clone();
            contact.account_id = req.account_id;
            contact.updated_at = Utc::now();
            contact.clone()
        }))
    }

    async fn delete_contact(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.contacts.owned(org_id, id).is_none() {
            return Ok(false);
        }
        Ok(tables.drop_contact(id))
    }
}
