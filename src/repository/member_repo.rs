//! Member repository (数据库访问层)

use crate::{
    error::AppError,
    models::member::{CredentialRecord, Member, MemberChanges, NewMember},
};
use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryStore, PgStore};

#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Member joined with its organization and role, by exact email
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, AppError>;

    async fn find_member_by_email(&self, email: &str) -> Result<Option<Member>, AppError>;

    async fn create_member(&self, new: &NewMember) -> Result<Member, AppError>;

    async fn list_members(&self, org_id: i64) -> Result<Vec<Member>, AppError>;

    async fn find_member(&self, org_id: i64, id: i64) -> Result<Option<Member>, AppError>;

    async fn update_member(
        &self,
        org_id: i64,
        id: i64,
        changes: &MemberChanges,
    ) -> Result<Option<Member>, AppError>;

    /// Removes the member and the records it created
    async fn delete_member(&self, org_id: i64, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
impl MemberStore for PgStore {
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, AppError> {
        let record = sqlx::query_as::<_, CredentialRecord>(
            r#"
            SELECT m.id AS member_id, m.name, m.email, m.password_hash, m.status,
                   o.id AS org_id, o.org_name, r.role_name
            FROM members m
            JOIN organizations o ON o.id = m.org_id
            JOIN roles r ON r.id = m.role_id
            WHERE m.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(record)
    }

    async fn find_member_by_email(&self, email: &str) -> Result<Option<Member>, AppError> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(member)
    }

    async fn create_member(&self, new: &NewMember) -> Result<Member, AppError> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, email, password_hash, status, org_id, role_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.status.as_str())
        .bind(new.org_id)
        .bind(new.role_id)
        .fetch_one(&self.db)
        .await?;

        Ok(member)
    }

    async fn list_members(&self, org_id: i64) -> Result<Vec<Member>, AppError> {
        let members =
            sqlx::query_as::<_, Member>("SELECT * FROM members WHERE org_id = $1 ORDER BY id")
                .bind(org_id)
                .fetch_all(&self.db)
                .await?;

        Ok(members)
    }

    async fn find_member(&self, org_id: i64, id: i64) -> Result<Option<Member>, AppError> {
        let member =
            sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1 AND org_id = $2")
                .bind(id)
                .bind(org_id)
                .fetch_optional(&self.db)
                .await?;

        Ok(member)
    }

    async fn update_member(
        &self,
        org_id: i64,
        id: i64,
        changes: &MemberChanges,
    ) -> Result<Option<Member>, AppError> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            UPDATE members
            SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                status = COALESCE($6, status),
                role_id = COALESCE($7, role_id),
                updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.role_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(member)
    }

    async fn delete_member(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(org_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, AppError> {
        let tables = self.tables.read().await;
        let Some(member) = tables.members.values().find(|m| m.email == email) else {
            return Ok(None);
        };
        let (Some(org), Some(role)) = (
            tables.organizations.get(member.org_id),
            tables.roles.get(member.role_id),
        ) else {
            return Ok(None);
        };

        Ok(Some(CredentialRecord {
            member_id: member.id,
            name: member.name.clone(),
            email: member.email.clone(),
            password_hash: member.password_hash.clone(),
            status: member.status.clone(),
            org_id: org.id,
            org_name: org.org_name.clone(),
            role_name: role.role_name.clone(),
        }))
    }

    async fn find_member_by_email(&self, email: &str) -> Result<Option<Member>, AppError> {
        let tables = self.tables.read().await;
        let found = tables.members.values().find(|m| m.email == email).cloned();
        Ok(found)
    }

    async fn create_member(&self, new: &NewMember) -> Result<Member, AppError> {
        let mut tables = self.tables.write().await;
        if tables.members.values().any(|m| m.email == new.email) {
            return Err(AppError::bad_request("Email already exists"));
        }
        if tables.organizations.get(new.org_id).is_none() {
            return Err(AppError::not_found("Organization"));
        }
        if tables.roles.get(new.role_id).is_none() {
            return Err(AppError::not_found("Role"));
        }

        let now = Utc::now();
        let id = tables.members.allocate_id();
        Ok(tables.members.insert(
            id,
            Member {
                id,
                name: new.name.clone(),
                email: new.email.clone(),
                password_hash: new.password_hash.clone(),
                status: new.status.as_str().to_string(),
                org_id: new.org_id,
                role_id: new.role_id,
                created_at: now,
                updated_at: now,
            },
        ))
    }

    async fn list_members(&self, org_id: i64) -> Result<Vec<Member>, AppError> {
        Ok(self.tables.read().await.members.list_owned(org_id))
    }

    async fn find_member(&self, org_id: i64, id: i64) -> Result<Option<Member>, AppError> {
        Ok(self.tables.read().await.members.owned(org_id, id).cloned())
    }

    async fn update_member(
        &self,
        org_id: i64,
        id: i64,
        changes: &MemberChanges,
    ) -> Result<Option<Member>, AppError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if tables.members.values().any(|m| m.id != id && &m.email == email) {
                return Err(AppError::bad_request("Email already exists"));
            }
        }

        Ok(tables.members.owned_mut(org_id, id).map(|member| {
            if let Some(name) = &changes.name {
                member.name = name.clone();
            }
            if let Some(email) = &changes.email {
                member.email = email.clone();
            }
            if let Some(hash) = &changes.password_hash {
                member.password_hash = hash.clone();
            }
            if let Some(status) = changes.status {
                member.status = status.as_str().to_string();
            }
            if let Some(role_id) = changes.role_id {
                member.role_id = role_id;
            }
            member.updated_at = Utc::now();
            member.clone()
        }))
    }

    async fn delete_member(&self, org_id: i64, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.members.owned(org_id, id).is_none() {
            return Ok(false);
        }
        Ok(tables.drop_member(id))
    }
}
