//! 认证服务：登录、注册、当前身份

use crate::{
    auth::{jwt::JwtService, middleware::AuthContext, password::PasswordHasher},
    config::AppConfig,
    error::{AppError, LoginFailure},
    models::{
        auth::*,
        member::{MemberStatus, NewMember},
        role::ADMIN,
    },
    repository::{CrmStore, MemberStore, OrganizationStore, RoleStore},
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub struct AuthService {
    store: Arc<dyn CrmStore>,
    jwt_service: Arc<JwtService>,
    hasher: Arc<PasswordHasher>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CrmStore>,
        jwt_service: Arc<JwtService>,
        hasher: Arc<PasswordHasher>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            jwt_service,
            hasher,
            config,
        }
    }

    /// 成员登录
    ///
    /// 校验顺序固定：输入格式、成员是否存在、密码、账户状态。
    /// 任一步失败即返回，后续步骤不再执行。
    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        let email = req.email.trim();
        validate_login_input(email, &req.password)?;

        let result = self.authenticate(email, &req.password).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(AppError::Login(failure)) => failure.as_label(),
            Err(_) => "error",
        };
        metrics::counter!("auth_login_total", "outcome" => outcome).increment(1);

        if let Err(AppError::Login(failure)) = &result {
            // 仅在内部日志中区分失败原因
            tracing::info!(email = %email, reason = failure.as_label(), "Login failed");
        }

        result
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        // 一次读取成员、组织与角色，后续检查都基于同一快照
        let record = self
            .store
            .find_credentials_by_email(email)
            .await?
            .ok_or(LoginFailure::NotFound)?;

        if !self.hasher.verify(password, &record.password_hash) {
            return Err(LoginFailure::InvalidCredentials.into());
        }

        let status: MemberStatus = record
            .status
            .parse()
            .map_err(|_| LoginFailure::AccountInactive)?;
        if !status.can_login() {
            return Err(LoginFailure::AccountInactive.into());
        }

        let token = self.jwt_service.issue(
            &record.email,
            record.org_id,
            &record.role_name,
            record.member_id,
        )?;

        tracing::info!(
            member_id = record.member_id,
            org_id = record.org_id,
            role = %record.role_name,
            expires_in = self.jwt_service.token_exp_secs(),
            "Login succeeded"
        );

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            member_id: record.member_id,
            email: record.email,
            name: record.name,
            org_id: record.org_id,
            org_name: record.org_name,
            role: record.role_name,
        })
    }

    /// 注册新组织及其首个管理员
    ///
    /// 重复检查在写入之前完成；管理员写入失败时删除刚创建的组织。
    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse, AppError> {
        let org_name = req.org_name.trim();
        let org_email = req.org_email.trim();
        let admin_name = req.admin_name.trim();
        let admin_email = req.admin_email.trim();

        PasswordHasher::validate_password_policy(&req.admin_password, &self.config.security)?;

        if self
            .store
            .find_organization_by_email(org_email)
            .await?
            .is_some()
        {
            return Err(AppError::bad_request("Organization email already exists"));
        }
        if self.store.find_member_by_email(admin_email).await?.is_some() {
            return Err(AppError::bad_request("Email already exists"));
        }

        let admin_role = self
            .store
            .find_role_by_name(ADMIN)
            .await?
            .ok_or_else(|| AppError::internal_error("Admin role is not seeded"))?;

        let password_hash = self.hasher.hash(&req.admin_password)?;

        let org = self.store.create_organization(org_name, org_email).await?;

        let new_member = NewMember {
            name: admin_name.to_string(),
            email: admin_email.to_string(),
            password_hash,
            status: MemberStatus::Active,
            org_id: org.id,
            role_id: admin_role.id,
        };

        let member = match self.store.create_member(&new_member).await {
            Ok(member) => member,
            Err(e) => {
                tracing::warn!(org_id = org.id, error = %e, "Admin creation failed, removing organization");
                if let Err(cleanup) = self.store.delete_organization(org.id).await {
                    tracing::error!(org_id = org.id, error = %cleanup, "Failed to remove organization");
                }
                return Err(e);
            }
        };

        tracing::info!(org_id = org.id, member_id = member.id, "Organization registered");

        Ok(RegisterResponse {
            message: "Organization registered successfully".to_string(),
            org_id: org.id,
            member_id: member.id,
        })
    }

    /// 当前请求携带的身份
    pub fn current_identity(&self, ctx: &AuthContext) -> CurrentIdentity {
        CurrentIdentity {
            email: ctx.subject.clone(),
            org_id: ctx.org_id,
            member_id: ctx.member_id,
            role: ctx.role.clone(),
            expires_at: ctx.expires_at,
        }
    }
}

/// 登录输入校验（在访问存储之前）
fn validate_login_input(email: &str, password: &str) -> Result<(), AppError> {
    if email.is_empty() {
        return Err(AppError::validation("Email is required"));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(AppError::validation("Email must be valid"));
    }
    if password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::test_config,
        models::member::MemberChanges,
        repository::MemoryStore,
        services::bootstrap::{self, DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD},
    };

    async fn setup() -> (AuthService, Arc<dyn CrmStore>, Arc<JwtService>) {
        let config = Arc::new(test_config());
        let store: Arc<dyn CrmStore> = Arc::new(MemoryStore::new());
        let hasher = Arc::new(PasswordHasher::from_config(&config.security).unwrap());
        let jwt = Arc::new(JwtService::from_config(&config.security).unwrap());
        bootstrap::seed(store.as_ref(), &hasher, &config.bootstrap)
            .await
            .unwrap();

        let service = AuthService::new(store.clone(), jwt.clone(), hasher, config);
        (service, store, jwt)
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success_claims_match_member() {
        let (service, _, jwt) = setup().await;

        let response = service
            .login(&login(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD))
            .await
            .unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.role, "Admin");
        assert_eq!(response.org_name, "Test Organization");

        let claims = jwt.verify(&response.token).unwrap();
        assert_eq!(claims.sub, DEMO_ADMIN_EMAIL);
        assert_eq!(claims.org_id, response.org_id);
        assert_eq!(claims.member_id, response.member_id);
        assert_eq!(claims.role, response.role);
    }

    #[tokio::test]
    async fn test_login_email_is_trimmed_but_case_sensitive() {
        let (service, _, _) = setup().await;

        assert!(service
            .login(&login("  admin@test.com ", DEMO_ADMIN_PASSWORD))
            .await
            .is_ok());

        let result = service
            .login(&login("Admin@Test.com", DEMO_ADMIN_PASSWORD))
            .await;
        assert!(matches!(result, Err(AppError::Login(LoginFailure::NotFound))));
    }

    #[tokio::test]
    async fn test_login_failure_kinds() {
        let (service, store, _) = setup().await;

        let result = service.login(&login("nobody@test.com", "password123")).await;
        assert!(matches!(result, Err(AppError::Login(LoginFailure::NotFound))));

        let result = service.login(&login(DEMO_ADMIN_EMAIL, "wrong-password")).await;
        assert!(matches!(
            result,
            Err(AppError::Login(LoginFailure::InvalidCredentials))
        ));

        store
            .update_member(
                1,
                1,
                &MemberChanges {
                    status: Some(MemberStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = service
            .login(&login(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD))
            .await;
        assert!(matches!(
            result,
            Err(AppError::Login(LoginFailure::AccountInactive))
        ));

        // 密码检查先于状态检查
        let result = service.login(&login(DEMO_ADMIN_EMAIL, "wrong-password")).await;
        assert!(matches!(
            result,
            Err(AppError::Login(LoginFailure::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn test_login_validation_before_lookup() {
        let (service, _, _) = setup().await;

        for (email, password) in [("", "x"), ("   ", "x"), ("not-an-email", "x"), ("a@b.io", "")] {
            let result = service.login(&login(email, password)).await;
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "expected validation error for {:?}",
                email
            );
        }
    }

    #[tokio::test]
    async fn test_register_creates_org_and_admin() {
        let (service, store, _) = setup().await;

        let response = service
            .register(&RegisterRequest {
                org_name: "Globex".to_string(),
                org_email: "hq@globex.io".to_string(),
                admin_name: "Hank".to_string(),
                admin_email: "hank@globex.io".to_string(),
                admin_password: "supersecret".to_string(),
            })
            .await
            .unwrap();

        assert_ne!(response.org_id, 1);
        let member = store
            .find_member(response.org_id, response.member_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(member.status(), MemberStatus::Active);

        let login = service
            .login(&login("hank@globex.io", "supersecret"))
            .await
            .unwrap();
        assert_eq!(login.org_id, response.org_id);
        assert_eq!(login.role, "Admin");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_without_writing() {
        let (service, store, _) = setup().await;

        let result = service
            .register(&RegisterRequest {
                org_name: "Dup".to_string(),
                org_email: "dup@org.io".to_string(),
                admin_name: "Dup".to_string(),
                admin_email: DEMO_ADMIN_EMAIL.to_string(),
                admin_password: "supersecret".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(store
            .find_organization_by_email("dup@org.io")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_register_applies_password_policy() {
        let (service, _, _) = setup().await;

        let result = service
            .register(&RegisterRequest {
                org_name: "Tiny".to_string(),
                org_email: "tiny@org.io".to_string(),
                admin_name: "T".to_string(),
                admin_email: "t@tiny.io".to_string(),
                admin_password: "short".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
