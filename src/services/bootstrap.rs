//! 启动数据初始化
//! 写入固定角色，以及可选的演示组织与管理员账号

use crate::{
    auth::password::PasswordHasher,
    config::BootstrapConfig,
    error::AppError,
    models::{
        member::{MemberStatus, NewMember},
        role::{ADMIN, SEEDED_ROLES},
    },
    repository::{CrmStore, MemberStore, OrganizationStore, RoleStore},
};

pub const DEMO_ORG_NAME: &str = "Test Organization";
pub const DEMO_ORG_EMAIL: &str = "admin@testorg.com";
pub const DEMO_ADMIN_NAME: &str = "Test Admin";
pub const DEMO_ADMIN_EMAIL: &str = "admin@test.com";
pub const DEMO_ADMIN_PASSWORD: &str = "password123";

/// 执行启动初始化（幂等）
pub async fn seed(
    store: &dyn CrmStore,
    hasher: &PasswordHasher,
    config: &BootstrapConfig,
) -> Result<(), AppError> {
    if config.seed_roles {
        seed_roles(store).await?;
    }
    if config.seed_demo_data {
        seed_demo_data(store, hasher).await?;
    }
    Ok(())
}

/// 写入缺失的固定角色
pub async fn seed_roles(store: &dyn CrmStore) -> Result<(), AppError> {
    for role_name in SEEDED_ROLES {
        if store.find_role_by_name(role_name).await?.is_none() {
            let role = store.create_role(role_name).await?;
            tracing::info!(role_id = role.id, role = %role.role_name, "Seeded role");
        }
    }
    Ok(())
}

/// 写入演示组织与管理员
pub async fn seed_demo_data(store: &dyn CrmStore, hasher: &PasswordHasher) -> Result<(), AppError> {
    let org = match store.find_organization_by_email(DEMO_ORG_EMAIL).await? {
        Some(org) => org,
        None => {
            let org = store
                .create_organization(DEMO_ORG_NAME, DEMO_ORG_EMAIL)
                .await?;
            tracing::info!(org_id = org.id, "Seeded demo organization");
            org
        }
    };

    if store.find_member_by_email(DEMO_ADMIN_EMAIL).await?.is_some() {
        return Ok(());
    }

    let admin_role = store
        .find_role_by_name(ADMIN)
        .await?
        .ok_or_else(|| AppError::Config("Admin role must exist before demo data".to_string()))?;

    let member = store
        .create_member(&NewMember {
            name: DEMO_ADMIN_NAME.to_string(),
            email: DEMO_ADMIN_EMAIL.to_string(),
            password_hash: hasher.hash(DEMO_ADMIN_PASSWORD)?,
            status: MemberStatus::Active,
            org_id: org.id,
            role_id: admin_role.id,
        })
        .await?;

    tracing::info!(member_id = member.id, org_id = org.id, "Seeded demo administrator");
    Ok(())
}
