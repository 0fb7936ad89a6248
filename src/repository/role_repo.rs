//! Role repository

use crate::{error::AppError, models::role::Role};
use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryStore, PgStore};

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn list_roles(&self) -> Result<Vec<Role>, AppError>;

    async fn find_role(&self, id: i64) -> Result<Option<Role>, AppError>;

    async fn find_role_by_name(&self, role_name: &str) -> Result<Option<Role>, AppError>;

    async fn create_role(&self, role_name: &str) -> Result<Role, AppError>;
}

#[async_trait]
impl RoleStore for PgStore {
    async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY id")
            .fetch_all(&self.db)
            .await?;

        Ok(roles)
    }

    async fn find_role(&self, id: i64) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(role)
    }

    async fn find_role_by_name(&self, role_name: &str) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE role_name = $1")
            .bind(role_name)
            .fetch_optional(&self.db)
            .await?;

        Ok(role)
    }

    async fn create_role(&self, role_name: &str) -> Result<Role, AppError> {
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (role_name) VALUES ($1) RETURNING *",
        )
        .bind(role_name)
        .fetch_one(&self.db)
        .await?;

        Ok(role)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        Ok(self.tables.read().await.roles.values().cloned().collect())
    }

    async fn find_role(&self, id: i64) -> Result<Option<Role>, AppError> {
        Ok(self.tables.read().await.roles.get(id).cloned())
    }

    async fn find_role_by_name(&self, role_name: &str) -> Result<Option<Role>, AppError> {
        let tables = self.tables.read().await;
        let found = tables
            .roles
            .values()
            .find(|r| r.role_name == role_name)
            .cloned();
        Ok(found)
    }

    async fn create_role(&self, role_name: &str) -> Result<Role, AppError> {
        let mut tables = self.tables.write().await;
        if tables.roles.values().any(|r| r.role_name == role_name) {
            return Err(AppError::bad_request("Role already exists"));
        }

        let now = Utc::now();
        let id = tables.roles.allocate_id();
        Ok(tables.roles.insert(
            id,
            Role {
                id,
                role_name: role_name.to_string(),
                created_at: now,
                updated_at: now,
            },
        ))
    }
}
