//! Activity repository

use crate::{
    error::AppError,
    models::activity::{Activity, ActivityRequest},
};
use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryStore, PgStore};

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn create_activity(
        &self,
        org_id: i64,
        member_id: i64,
        req: &ActivityRequest,
    ) -> Result<Activity, AppError>;

    async fn list_activities(&self, org_id: i64) -> Result<Vec<Activity>, AppError>;

    async fn find_activity(&self, org_id: i64, id: i64) -> Result<Option<Activity>, AppError>;

    async fn update_activity(
        &self,
        org_id: i64,
        id: i64,
        req: &ActivityRequest,
    ) -> Result<Option<Activity>, AppError>;

    async fn delete_activity(&self, org_id: i64, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
impl ActivityStore for PgStore {
    async fn create_activity(
        &self,
        org_id: i64,
        member_id: i64,
        req: &ActivityRequest,
    ) -> Result<Activity, AppError> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (
                activity_type, subject, description, activity_date, status, priority,
                lead_id, contact_id, account_id, deal_id, org_id, member_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&req.activity_type)
        .bind(&req.subject)
        .bind(&req.description)
        .bind(req.activity_date)
        .bind(&req.status)
        .bind(&req.priority)
        .bind(req.lead_id)
        .bind(req.contact_id)
        .bind(req.account_id)
        .bind(req.deal_id)
        .bind(org_id)
        .bind(member_id)
        .fetch_one(&self.db)
        .await?;

        Ok(activity)
    }

    async fn list_activities(&self, org_id: i64) -> Result<Vec<Activity>, AppError> {
        let activities = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE org_id = $1 ORDER BY activity_date DESC, id",
        )
        .bind(org_id)
        .fetch_all(&self.db)
        .await?;

        Ok(activities)
    }

    async fn find_activity(&self, org_id: i64, id: i64) -> Result<Option<Activity>, AppError> {
        let activity = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE id = $1 AND org_id = $2",
        )
        .bind(id)
        .bind(org_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(activity)
    }

    async fn update_activity(
        &self,
        org_id: i64,
        id: i64,
        req: &ActivityRequest,
    ) -> Result<Option<Activity>, AppError> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities
            SET
                activity_type = $3, subject = $4, description = $5, activity_date = $6,
                status = $7, priority = $8, lead_id = $9, contact_id = $10,
                account_id = $11, deal_id = $12, updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(&req.activity_type)
        .bind(&req.subject)
        .bind(&req.description)
        .bind(req.activity_date)
        .bind(&req.status)
        .bind(&req.priority)
        .bind(req.lead_id)
        .bind(req.contact_id)
        .bind(req.account_id)
        .bind(req.deal_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(activity)
    }

    async fn delete_activity(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(org_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn apply(activity: &mut Activity, req: &ActivityRequest) {
    activity.activity_type = req.activity_type.clone();
    activity.subject = req.subject.clone();
    activity.description = req.description.clone();
    activity.activity_date = req.activity_date;
    activity.status = req.status.clone();
    activity.priority = req.priority.clone();
    activity.lead_id = req.lead_id;
    activity.contact_id = req.contact_id;
    activity.account_id = req.account_id;
    activity.deal_id = req.deal_id;
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn create_activity(
        &self,
        org_id: i64,
        member_id: i64,
        req: &ActivityRequest,
    ) -> Result<Activity, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = tables.activities.allocate_id();
        let mut activity = Activity {
            id,
            activity_type: String::new(),
            subject: String::new(),
            description: None,
            activity_date: req.activity_date,
            status: None,
            priority: None,
            org_id,
            member_id,
            lead_id: None,
            contact_id: None,
            account_id: None,
            deal_id: None,
            created_at: now,
            updated_at: now,
        };
        apply(&mut activity, req);
        Ok(tables.activities.insert(id, activity))
    }

    async fn list_activities(&self, org_id: i64) -> Result<Vec<Activity>, AppError> {
        let mut activities = self.tables.read().await.activities.list_owned(org_id);
        // Newest first
        activities.sort_by(|a, b| b.activity_date.cmp(&a.activity_date).then(a.id.cmp(&b.id)));
        Ok(activities)
    }

    async fn find_activity(&self, org_id: i64, id: i64) -> Result<Option<Activity>, AppError> {
        Ok(self.tables.read().await.activities.owned(org_id, id).cloned())
    }

    async fn update_activity(
        &self,
        org_id: i64,
        id: i64,
        req: &ActivityRequest,
    ) -> Result<Option<Activity>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.activities.owned_mut(org_id, id).map(|activity| {
            apply(activity, req);
            activity.updated_at = Utc::now();
            activity.clone()
        }))
    }

    async fn delete_activity(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.activities.owned(org_id, id).is_none() {
            return Ok(false);
        }
        Ok(tables.activities.remove(id).is_some())
    }
}
