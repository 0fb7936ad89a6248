//! Deal repository

use crate::{
    error::AppError,
    models::{
        deal::{Deal, DealRequest},
        MonthlyCount, StageCount,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;

use super::{memory::monthly_counts, MemoryStore, PgStore};

#[async_trait]
pub trait DealStore: Send + Sync {
    async fn create_deal(
        &self,
        org_id: i64,
        member_id: i64,
        req: &DealRequest,
    ) -> Result<Deal, AppError>;

    async fn list_deals(&self, org_id: i64) -> Result<Vec<Deal>, AppError>;

    async fn find_deal(&self, org_id: i64, id: i64) -> Result<Option<Deal>, AppError>;

    async fn update_deal(
        &self,
        org_id: i64,
        id: i64,
        req: &DealRequest,
    ) -> Result<Option<Deal>, AppError>;

    async fn delete_deal(&self, org_id: i64, id: i64) -> Result<bool, AppError>;

    async fn deal_monthly_counts(&self, org_id: i64) -> Result<Vec<MonthlyCount>, AppError>;

    /// Deal count per stage, ordered by stage name
    async fn deal_stage_counts(&self, org_id: i64) -> Result<Vec<StageCount>, AppError>;
}

#[async_trait]
impl DealStore for PgStore {
    async fn create_deal(
        &self,
        org_id: i64,
        member_id: i64,
        req: &DealRequest,
    ) -> Result<Deal, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            INSERT INTO deals (
                deal_name, description, deal_value, deal_stage, expected_close_date,
                actual_close_date, probability, account_id, contact_id, org_id, member_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&req.deal_name)
        .bind(&req.description)
        .bind(req.deal_value)
        .bind(&req.deal_stage)
        .bind(req.expected_close_date)
        .bind(req.actual_close_date)
        .bind(&req.probability)
        .bind(req.account_id)
        .bind(req.contact_id)
        .bind(org_id)
        .bind(member_id)
        .fetch_one(&self.db)
        .await?;

        Ok(deal)
    }

    async fn list_deals(&self, org_id: i64) -> Result<Vec<Deal>, AppError> {
        let deals = sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE org_id = $1 ORDER BY id")
            .bind(org_id)
            .fetch_all(&self.db)
            .await?;

        Ok(deals)
    }

    async fn find_deal(&self, org_id: i64, id: i64) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(org_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(deal)
    }

    async fn update_deal(
        &self,
        org_id: i64,
        id: i64,
        req: &DealRequest,
    ) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            UPDATE deals
            SET
                deal_name = $3, description = $4, deal_value = $5, deal_stage = $6,
                expected_close_date = $7, actual_close_date = $8, probability = $9,
                account_id = $10, contact_id = $11, updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(&req.deal_name)
        .bind(&req.description)
        .bind(req.deal_value)
        .bind(&req.deal_stage)
        .bind(req.expected_close_date)
        .bind(req.actual_close_date)
        .bind(&req.probability)
        .bind(req.account_id)
        .bind(req.contact_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(deal)
    }

    async fn delete_deal(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(org_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn deal_monthly_counts(&self, org_id: i64) -> Result<Vec<MonthlyCount>, AppError> {
        let counts = sqlx::query_as::<_, MonthlyCount>(
            r#"
            SELECT
                EXTRACT(YEAR FROM created_at)::INT AS year,
                EXTRACT(MONTH FROM created_at)::INT AS month,
                COUNT(*) AS count
            FROM deals
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

    async fn deal_stage_counts(&self, org_id: i64) -> Result<Vec<StageCount>, AppError> {
        let counts = sqlx::query_as::<_, StageCount>(
            r#"
            SELECT deal_stage AS stage, COUNT(*) AS count
            FROM deals
            WHERE org_id = $1
            GROUP BY deal_stage
            ORDER BY deal_stage
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.db)
        .await?;

        Ok(counts)
    }
}

fn apply(deal: &mut Deal, req: &DealRequest) {
    deal.deal_name = req.deal_name.clone();
    deal.description = req.description.clone();
    deal.deal_value = req.deal_value;
    deal.deal_stage = req.deal_stage.clone();
    deal.expected_close_date = req.expected_close_date;
    deal.actual_close_date = req.actual_close_date;
    deal.probability = req.probability.clone();
    deal.account_id = req.account_id;
    deal.contact_id = req.contact_id;
}

#[async_trait]
impl DealStore for MemoryStore {
    async fn create_deal(
        &self,
        org_id: i64,
        member_id: i64,
        req: &DealRequest,
    ) -> Result<Deal, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = tables.deals.allocate_id();
        let mut deal = Deal {
            id,
            deal_name: String::new(),
            description: None,
            deal_value: req.deal_value,
            deal_stage: String::new(),
            expected_close_date: None,
            actual_close_date: None,
            probability: None,
            org_id,
            member_id,
            account_id: None,
            contact_id: None,
            created_at: now,
            updated_at: now,
        };
        apply(&mut deal, req);
        Ok(tables.deals.insert(id, deal))
    }

    async fn list_deals(&self, org_id: i64) -> Result<Vec<Deal>, AppError> {
        Ok(self.tables.read().await.deals.list_owned(org_id))
    }

    async fn find_deal(&self, org_id: i64, id: i64) -> Result<Option<Deal>, AppError> {
        Ok(self.tables.read().await.deals.owned(org_id, id).cloned())
    }

    async fn update_deal(
        &self,
        org_id: i64,
        id: i64,
        req: &DealRequest,
    ) -> Result<Option<Deal>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.deals.owned_mut(org_id, id).map(|deal| {
            apply(deal, req);
            deal.updated_at = Utc::now();
            deal.clone()
        }))
    }

    async fn delete_deal(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.deals.owned(org_id, id).is_none() {
            return Ok(false);
        }
        Ok(tables.drop_deal(id))
    }

    async fn deal_monthly_counts(&self, org_id: i64) -> Result<Vec<MonthlyCount>, AppError> {
        let tables = self.tables.read().await;
        Ok(monthly_counts(
            tables
                .deals
                .values()
                .filter(|d| d.org_id == org_id)
                .map(|d| &d.created_at),
        ))
    }

    async fn deal_stage_counts(&self, org_id: i64) -> Result<Vec<StageCount>, AppError> {
        let tables = self.tables.read().await;
        let mut stages: BTreeMap<String, i64> = BTreeMap::new();
        for deal in tables.deals.values().filter(|d| d.org_id == org_id) {
            *stages.entry(deal.deal_stage.clone()).or_default() += 1;
        }
        Ok(stages
            .into_iter()
            .map(|(stage, count)| StageCount { stage, count })
            .collect())
    }
}
