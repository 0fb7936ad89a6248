//! Lead repository

use crate::{
    error::AppError,
    models::{
        lead::{Lead, LeadRequest},
        MonthlyCount,
    },
};
use async_trait::async_trait;
use chrono::Utc;

use super::{memory::monthly_counts, MemoryStore, PgStore};

#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn create_lead(
        &self,
        org_id: i64,
        member_id: i64,
        req: &LeadRequest,
    ) -> Result<Lead, AppError>;

    async fn list_leads(&self, org_id: i64) -> Result<Vec<Lead>, AppError>;

    async fn find_lead(&self, org_id: i64, id: i64) -> Result<Option<Lead>, AppError>;

    async fn update_lead(
        &self,
        org_id: i64,
        id: i64,
        req: &LeadRequest,
    ) -> Result<Option<Lead>, AppError>;

    async fn set_lead_verified(
        &self,
        org_id: i64,
        id: i64,
        is_verified: bool,
    ) -> Result<Option<Lead>, AppError>;

    async fn delete_lead(&self, org_id: i64, id: i64) -> Result<bool, AppError>;

    async fn lead_monthly_counts(&self, org_id: i64) -> Result<Vec<MonthlyCount>, AppError>;
}

#[async_trait]
impl LeadStore for PgStore {
    async fn create_lead(
        &self,
        org_id: i64,
        member_id: i64,
        req: &LeadRequest,
    ) -> Result<Lead, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (lead_name, lead_email, phone, is_verified, org_id, member_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&req.lead_name)
        .bind(&req.lead_email)
        .bind(&req.phone)
        .bind(req.is_verified.unwrap_or(false))
        .bind(org_id)
        .bind(member_id)
        .fetch_one(&self.db)
        .await?;

        Ok(lead)
    }

    async fn list_leads(&self, org_id: i64) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE org_id = $1 ORDER BY id")
            .bind(org_id)
            .fetch_all(&self.db)
            .await?;

        Ok(leads)
    }

    async fn find_lead(&self, org_id: i64, id: i64) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(org_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(lead)
    }

    async fn update_lead(
        &self,
        org_id: i64,
        id: i64,
        req: &LeadRequest,
    ) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads
            SET
                lead_name = $3,
                lead_email = $4,
                phone = $5,
                is_verified = COALESCE($6, is_verified),
                updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(&req.lead_name)
        .bind(&req.lead_email)
        .bind(&req.phone)
        .bind(req.is_verified)
        .fetch_optional(&self.db)
        .await?;

        Ok(lead)
    }

    async fn set_lead_verified(
        &self,
        org_id: i64,
        id: i64,
        is_verified: bool,
    ) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads SET is_verified = $3, updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(is_verified)
        .fetch_optional(&self.db)
        .await?;

        Ok(lead)
    }

    async fn delete_lead(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(org_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn lead_monthly_counts(&self, org_id: i64) -> Result<Vec<MonthlyCount>, AppError> {
        let counts = sqlx::query_as::<_, MonthlyCount>(
            r#"
            SELECT
                EXTRACT(YEAR FROM created_at)::INT AS year,
                EXTRACT(MONTH FROM created_at)::INT AS month,
                COUNT(*) AS count
            FROM leads
            WHERE org_id = $1
            GROUP BY 1, 2
            ORDER BY 1, 2
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.db)
        .await?;

        Ok(counts)
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn create_lead(
        &self,
        org_id: i64,
        member_id: i64,
        req: &LeadRequest,
    ) -> Result<Lead, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = tables.leads.allocate_id();
        Ok(tables.leads.insert(
            id,
            Lead {
                id,
                lead_name: req.lead_name.clone(),
                lead_email: req.lead_email.clone(),
                phone: req.phone.clone(),
                is_verified: req.is_verified.unwrap_or(false),
                org_id,
                member_id,
                created_at: now,
                updated_at: now,
            },
        ))
    }

    async fn list_leads(&self, org_id: i64) -> Result<Vec<Lead>, AppError> {
        Ok(self.tables.read().await.leads.list_owned(org_id))
    }

    async fn find_lead(&self, org_id: i64, id: i64) -> Result<Option<Lead>, AppError> {
        Ok(self.tables.read().await.leads.owned(org_id, id).cloned())
    }

    async fn update_lead(
        &self,
        org_id: i64,
        id: i64,
        req: &LeadRequest,
    ) -> Result<Option<Lead>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.leads.owned_mut(org_id, id).map(|lead| {
            lead.lead_name = req.lead_name.clone();
            lead.lead_email = req.lead_email.clone();
            lead.phone = req.phone.clone();
            if let Some(verified) = req.is_verified {
                lead.is_verified = verified;
            }
            lead.updated_at = Utc::now();
            lead.clone()
        }))
    }

    async fn set_lead_verified(
        &self,
        org_id: i64,
        id: i64,
        is_verified: bool,
    ) -> Result<Option<Lead>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.leads.owned_mut(org_id, id).map(|lead| {
            lead.is_verified = is_verified;
            lead.updated_at = Utc::now();
            lead.clone()
        }))
    }

    async fn delete_lead(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.leads.owned(org_id, id).is_none() {
            return Ok(false);
        }
        Ok(tables.drop_lead(id))
    }

    async fn lead_monthly_counts(&self, org_id: i64) -> Result<Vec<MonthlyCount>, AppError> {
        let tables = self.tables.read().await;
        Ok(monthly_counts(
            tables
                .leads
                .values()
                .filter(|l| l.org_id == org_id)
                .map(|l| &l.created_at),
        ))
    }
}
