//! PostgreSQL store (数据库访问层)

use crate::db::{self, HealthStatus};
use async_trait::async_trait;
use sqlx::PgPool;

use super::StoreHealth;

/// Store backed by a sqlx connection pool
#[derive(Clone)]
pub struct PgStore {
    pub(crate) db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health(&self) -> HealthStatus {
        db::record_pool_metrics(&self.db);
        db::health_check(&self.db).await
    }
}
