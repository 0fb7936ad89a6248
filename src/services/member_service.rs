//! 成员管理服务

use crate::{
    auth::{password::PasswordHasher, tenant::TenantScope},
    config::SecurityConfig,
    error::AppError,
    models::{
        member::*,
        role::{Role, ADMIN, MANAGER},
    },
    repository::{CrmStore, MemberStore, RoleStore},
};
use std::{collections::HashMap, sync::Arc};

/// 可以管理成员的角色
const MEMBER_ADMIN_ROLES: [&str; 2] = [ADMIN, MANAGER];

pub struct MemberService {
    store: Arc<dyn CrmStore>,
    hasher: Arc<PasswordHasher>,
    security: SecurityConfig,
}

impl MemberService {
    pub fn new(store: Arc<dyn CrmStore>, hasher: Arc<PasswordHasher>, security: SecurityConfig) -> Self {
        Self {
            store,
            hasher,
            security,
        }
    }

    /// 列出本组织成员
    pub async fn list(&self, scope: &TenantScope) -> Result<Vec<MemberResponse>, AppError> {
        let roles = self.role_names().await?;
        let members = self.store.list_members(scope.organization_id()).await?;

        Ok(members
            .into_iter()
            .map(|m| {
                let role_name = roles.get(&m.role_id).cloned();
                MemberResponse::new(m, role_name)
            })
            .collect())
    }

    pub async fn get(&self, scope: &TenantScope, id: i64) -> Result<MemberResponse, AppError> {
        let member = self.find(scope, id).await?;
        self.respond(member).await
    }

    /// 在本组织创建成员（Admin / Manager）
    pub async fn create(
        &self,
        scope: &TenantScope,
        req: &CreateMemberRequest,
    ) -> Result<MemberResponse, AppError> {
        scope.require_any_role(&MEMBER_ADMIN_ROLES)?;
        PasswordHasher::validate_password_policy(&req.password, &self.security)?;

        let email = req.email.trim();
        if self.store.find_member_by_email(email).await?.is_some() {
            return Err(AppError::bad_request("Email already exists"));
        }
        let role = self.role(req.role_id).await?;
        require_admin_for(scope, role.role_name == ADMIN)?;

        let member = self
            .store
            .create_member(&NewMember {
                name: req.name.trim().to_string(),
                email: email.to_string(),
                password_hash: self.hasher.hash(&req.password)?,
                status: req.status.unwrap_or(MemberStatus::Active),
                org_id: scope.organization_id(),
                role_id: req.role_id,
            })
            .await?;

        tracing::info!(
            member_id = member.id,
            org_id = member.org_id,
            created_by = scope.member_id(),
            "Member created"
        );
        self.respond(member).await
    }

    /// 更新成员
    ///
    /// 成员可以修改自己的姓名、邮箱、密码；修改他人或修改角色、状态需要 Admin / Manager。
    /// 授予 Admin 角色或修改现任 Admin 只能由 Admin 操作。
    pub async fn update(
        &self,
        scope: &TenantScope,
        id: i64,
        req: &UpdateMemberRequest,
    ) -> Result<MemberResponse, AppError> {
        let target = self.find(scope, id).await?;

        let self_service = scope.is_authenticated()
            && scope.member_id() == id
            && req.role_id.is_none()
            && req.status.is_none();
        if !self_service {
            scope.require_any_role(&MEMBER_ADMIN_ROLES)?;
        }

        let grants_admin = match req.role_id {
            Some(role_id) => self.role(role_id).await?.role_name == ADMIN,
            None => false,
        };
        require_admin_for(scope, grants_admin || self.is_admin(&target).await?)?;

        let email = req.email.as_deref().map(str::trim);
        if let Some(email) = email {
            if let Some(existing) = self.store.find_member_by_email(email).await? {
                if existing.id != id {
                    return Err(AppError::bad_request("Email already exists"));
                }
            }
        }
        let password_hash = match &req.password {
            Some(password) => {
                PasswordHasher::validate_password_policy(password, &self.security)?;
                Some(self.hasher.hash(password)?)
            }
            None => None,
        };

        let changes = MemberChanges {
            name: req.name.as_deref().map(|n| n.trim().to_string()),
            email: email.map(str::to_string),
            password_hash,
            status: req.status,
            role_id: req.role_id,
        };

        let member = self
            .store
            .update_member(scope.organization_id(), id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("Member"))?;

        tracing::info!(member_id = id, updated_by = scope.member_id(), "Member updated");
        self.respond(member).await
    }

    /// 修改成员状态，任意状态之间均可转换
    pub async fn change_status(
        &self,
        scope: &TenantScope,
        id: i64,
        status: MemberStatus,
    ) -> Result<MemberResponse, AppError> {
        scope.require_any_role(&MEMBER_ADMIN_ROLES)?;
        let target = self.find(scope, id).await?;
        require_admin_for(scope, self.is_admin(&target).await?)?;

        let changes = MemberChanges {
            status: Some(status),
            ..Default::default()
        };
        let member = self
            .store
            .update_member(scope.organization_id(), id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("Member"))?;

        tracing::info!(member_id = id, status = %status, "Member status changed");
        self.respond(member).await
    }

    /// 删除成员及其创建的记录（Admin，不能删除自己）
    pub async fn delete(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        scope.require_any_role(&[ADMIN])?;
        if scope.member_id() == id {
            return Err(AppError::bad_request("You cannot delete your own account"));
        }

        if !self.store.delete_member(scope.organization_id(), id).await? {
            return Err(AppError::not_found("Member"));
        }

        tracing::info!(member_id = id, deleted_by = scope.member_id(), "Member deleted");
        Ok(())
    }

    async fn find(&self, scope: &TenantScope, id: i64) -> Result<Member, AppError> {
        self.store
            .find_member(scope.organization_id(), id)
            .await?
            .ok_or_else(|| AppError::not_found("Member"))
    }

    async fn role(&self, role_id: i64) -> Result<Role, AppError> {
        self.store
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::bad_request("Role not found"))
    }

    async fn is_admin(&self, member: &Member) -> Result<bool, AppError> {
        let role = self.store.find_role(member.role_id).await?;
        Ok(role.is_some_and(|r| r.role_name == ADMIN))
    }

    async fn role_names(&self) -> Result<HashMap<i64, String>, AppError> {
        Ok(self
            .store
            .list_roles()
            .await?
            .into_iter()
            .map(|r| (r.id, r.role_name))
            .collect())
    }

    async fn respond(&self, member: Member) -> Result<MemberResponse, AppError> {
        let role_name = self.store.find_role(member.role_id).await?.map(|r| r.role_name);
        Ok(MemberResponse::new(member, role_name))
    }
}

/// 涉及 Admin 角色的操作只允许 Admin
fn require_admin_for(scope: &TenantScope, touches_admin: bool) -> Result<(), AppError> {
    if touches_admin {
        scope.require_any_role(&[ADMIN])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::test_config, services::test_support::*};

    async fn setup() -> (MemberService, Arc<dyn CrmStore>) {
        let config = test_config();
        let store = seeded_store().await;
        let hasher = Arc::new(PasswordHasher::from_config(&config.security).unwrap());
        (
            MemberService::new(store.clone(), hasher, config.security),
            store,
        )
    }

    async fn role_id(store: &dyn CrmStore, name: &str) -> i64 {
        store.find_role_by_name(name).await.unwrap().unwrap().id
    }

    fn create_request(email: &str, role_id: i64) -> CreateMemberRequest {
        CreateMemberRequest {
            name: "Rita Rep".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            role_id,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_member_defaults_active() {
        let (service, store) = setup().await;
        let rep_role = role_id(store.as_ref(), "Sales Rep").await;

        let member = service
            .create(&scope(1, 1, "Admin"), &create_request("rita@test.com", rep_role))
            .await
            .unwrap();

        assert_eq!(member.org_id, 1);
        assert_eq!(member.status, "ACTIVE");
        assert_eq!(member.role_name.as_deref(), Some("Sales Rep"));

        let duplicate = service
            .create(&scope(1, 1, "Admin"), &create_request("rita@test.com", rep_role))
            .await;
        assert!(matches!(duplicate, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_sales_rep_cannot_create_members() {
        let (service, store) = setup().await;
        let rep_role = role_id(store.as_ref(), "Sales Rep").await;

        let result = service
            .create(&scope(1, 1, "Sales Rep"), &create_request("x@test.com", rep_role))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_self_update_allowed_but_not_role_change() {
        let (service, store) = setup().await;
        let rep_role = role_id(store.as_ref(), "Sales Rep").await;
        let admin_role = role_id(store.as_ref(), "Admin").await;

        let rep = service
            .create(&scope(1, 1, "Admin"), &create_request("rita@test.com", rep_role))
            .await
            .unwrap();
        let as_rep = scope(1, rep.member_id, "Sales Rep");

        let renamed = service
            .update(
                &as_rep,
                rep.member_id,
                &UpdateMemberRequest {
                    name: Some("Rita R.".to_string()),
                    email: None,
                    password: None,
                    role_id: None,
                    status: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Rita R.");

        let escalate = service
            .update(
                &as_rep,
                rep.member_id,
                &UpdateMemberRequest {
                    name: None,
                    email: None,
                    password: None,
                    role_id: Some(admin_role),
                    status: None,
                },
            )
            .await;
        assert!(matches!(escalate, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_manager_cannot_touch_admin_role() {
        let (service, store) = setup().await;
        let rep_role = role_id(store.as_ref(), "Sales Rep").await;
        let manager_role = role_id(store.as_ref(), "Manager").await;
        let admin_role = role_id(store.as_ref(), "Admin").await;
        let admin = scope(1, 1, "Admin");

        let manager = service
            .create(&admin, &create_request("mgr@test.com", manager_role))
            .await
            .unwrap();
        let as_manager = scope(1, manager.member_id, "Manager");

        // 不能创建 Admin
        let created = service
            .create(&as_manager, &create_request("boss@test.com", admin_role))
            .await;
        assert!(matches!(created, Err(AppError::Forbidden)));

        // 不能把自己提升为 Admin
        let promote = UpdateMemberRequest {
            name: None,
            email: None,
            password: None,
            role_id: Some(admin_role),
            status: None,
        };
        assert!(matches!(
            service.update(&as_manager, manager.member_id, &promote).await,
            Err(AppError::Forbidden)
        ));

        // 不能修改现任 Admin 的密码或状态
        let reset = UpdateMemberRequest {
            name: None,
            email: None,
            password: Some("hijacked123".to_string()),
            role_id: None,
            status: None,
        };
        assert!(matches!(
            service.update(&as_manager, 1, &reset).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            service
                .change_status(&as_manager, 1, MemberStatus::Suspended)
                .await,
            Err(AppError::Forbidden)
        ));

        let admin_member = service.get(&admin, 1).await.unwrap();
        assert_eq!(admin_member.status, "ACTIVE");
        assert_eq!(admin_member.role_name.as_deref(), Some("Admin"));

        // 管理非 Admin 成员不受影响
        let rep = service
            .create(&as_manager, &create_request("rita@test.com", rep_role))
            .await
            .unwrap();
        service
            .change_status(&as_manager, rep.member_id, MemberStatus::Suspended)
            .await
            .unwrap();

        // Admin 可以授予 Admin
        let promoted = service
            .update(&admin, manager.member_id, &promote)
            .await
            .unwrap();
        assert_eq!(promoted.role_name.as_deref(), Some("Admin"));
    }

    #[tokio::test]
    async fn test_status_transitions_and_delete_rules() {
        let (service, store) = setup().await;
        let rep_role = role_id(store.as_ref(), "Sales Rep").await;
        let admin = scope(1, 1, "Admin");

        let rep = service
            .create(&admin, &create_request("rita@test.com", rep_role))
            .await
            .unwrap();

        for status in [
            MemberStatus::Suspended,
            MemberStatus::Inactive,
            MemberStatus::Active,
        ] {
            let updated = service
                .change_status(&admin, rep.member_id, status)
                .await
                .unwrap();
            assert_eq!(updated.status, status.as_str());
        }

        assert!(matches!(
            service.delete(&admin, 1).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service.delete(&scope(1, 1, "Manager"), rep.member_id).await,
            Err(AppError::Forbidden)
        ));

        service.delete(&admin, rep.member_id).await.unwrap();
        assert!(matches!(
            service.get(&admin, rep.member_id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_members_scoped_to_org() {
        let (service, store) = setup().await;
        let other = second_org(store.as_ref()).await;

        assert_eq!(service.list(&scope(1, 1, "Admin")).await.unwrap().len(), 1);
        assert!(service
            .list(&scope(other.id, 50, "Admin"))
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            service.get(&scope(other.id, 50, "Admin"), 1).await,
            Err(AppError::NotFound(_))
        ));
    }
}
