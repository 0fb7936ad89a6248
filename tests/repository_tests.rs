//! 存储层测试
//!
//! 同一组用例分别跑在内存存储和 PostgreSQL 上（后者需设置
//! `TEST_DATABASE_URL`，默认忽略）。

use crm_service::{
    db,
    models::{
        account::AccountRequest,
        lead::LeadRequest,
        member::{MemberChanges, MemberStatus, NewMember},
        role::ADMIN,
    },
    repository::{
        AccountStore, CrmStore, LeadStore, MemberStore, MemoryStore, OrganizationStore, RoleStore,
        StoreHealth,
    },
    services::bootstrap,
};
use secrecy::Secret;
use std::sync::Arc;
use uuid::Uuid;

mod common;
use common::create_test_config;

fn lead(name: &str) -> LeadRequest {
    LeadRequest {
        lead_name: name.to_string(),
        lead_email: format!("{}@lead.io", name.to_lowercase()),
        phone: None,
        is_verified: None,
    }
}

/// 建一个组织和它的管理员，返回 (org_id, member_id, email)
async fn org_with_admin(store: &dyn CrmStore) -> (i64, i64, String) {
    let tag = Uuid::new_v4().simple().to_string();
    let org = store
        .create_organization(&format!("Org {}", tag), &format!("org-{}@test.io", tag))
        .await
        .unwrap();
    let role = store.find_role_by_name(ADMIN).await.unwrap().unwrap();

    let email = format!("admin-{}@test.io", tag);
    let member = store
        .create_member(&NewMember {
            name: "Admin".to_string(),
            email: email.clone(),
            password_hash: "$argon2id$placeholder".to_string(),
            status: MemberStatus::Active,
            org_id: org.id,
            role_id: role.id,
        })
        .await
        .unwrap();

    (org.id, member.id, email)
}

async fn check_credentials_snapshot(store: &dyn CrmStore) {
    let (org_id, member_id, email) = org_with_admin(store).await;

    let record = store
        .find_credentials_by_email(&email)
        .await
        .unwrap()
        .expect("credentials should exist");
    assert_eq!(record.member_id, member_id);
    assert_eq!(record.org_id, org_id);
    assert_eq!(record.role_name, ADMIN);
    assert_eq!(record.status, "ACTIVE");
    assert!(record.org_name.starts_with("Org "));

    // 精确匹配，区分大小写
    assert!(store
        .find_credentials_by_email(&email.to_uppercase())
        .await
        .unwrap()
        .is_none());

    store
        .update_member(
            org_id,
            member_id,
            &MemberChanges {
                status: Some(MemberStatus::Suspended),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    let record = store.find_credentials_by_email(&email).await.unwrap().unwrap();
    assert_eq!(record.status, "SUSPENDED");
}

async fn check_tenant_isolation(store: &dyn CrmStore) {
    let (org_a, member_a, _) = org_with_admin(store).await;
    let (org_b, _, _) = org_with_admin(store).await;

    let created = store.create_lead(org_a, member_a, &lead("Alpha")).await.unwrap();
    assert_eq!(created.org_id, org_a);
    assert_eq!(created.member_id, member_a);
    assert!(!created.is_verified);

    assert!(store.find_lead(org_b, created.id).await.unwrap().is_none());
    assert!(store
        .update_lead(org_b, created.id, &lead("Hijack"))
        .await
        .unwrap()
        .is_none());
    assert!(!store.delete_lead(org_b, created.id).await.unwrap());
    assert!(store.list_leads(org_b).await.unwrap().is_empty());

    let found = store.find_lead(org_a, created.id).await.unwrap().unwrap();
    assert_eq!(found.lead_name, "Alpha");
}

async fn check_organization_delete_cascades(store: &dyn CrmStore) {
    let (org_id, member_id, email) = org_with_admin(store).await;
    let lead = store.create_lead(org_id, member_id, &lead("Gone")).await.unwrap();

    assert!(store.delete_organization(org_id).await.unwrap());

    assert!(store.find_organization(org_id).await.unwrap().is_none());
    assert!(store.find_member_by_email(&email).await.unwrap().is_none());
    assert!(store.find_lead(org_id, lead.id).await.unwrap().is_none());
}

async fn check_email_lookups(store: &dyn CrmStore) {
    let (org_id, member_id, email) = org_with_admin(store).await;
    let (other_org, _, _) = org_with_admin(store).await;

    let member = store.find_member_by_email(&email).await.unwrap().unwrap();
    assert_eq!(member.id, member_id);
    assert!(store.find_member_by_email("nobody@test.io").await.unwrap().is_none());

    let org = store.find_organization(org_id).await.unwrap().unwrap();
    let by_email = store
        .find_organization_by_email(&org.org_email)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, org_id);

    let role = store.find_role_by_name("Sales Rep").await.unwrap().unwrap();
    assert_eq!(role.role_name, "Sales Rep");
    assert!(store.find_role_by_name("Owner").await.unwrap().is_none());

    let account_email = format!("billing-{}@acme.io", org_id);
    let account = store
        .create_account(
            org_id,
            member_id,
            &AccountRequest {
                account_name: "Acme".to_string(),
                email: Some(account_email.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let found = store
        .find_account_by_email(org_id, &account_email)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, account.id);
    // 账户邮箱按组织隔离
    assert!(store
        .find_account_by_email(other_org, &account_email)
        .await
        .unwrap()
        .is_none());
}

async fn run_store_suite(store: Arc<dyn CrmStore>) {
    bootstrap::seed_roles(store.as_ref()).await.unwrap();
    // 重复初始化不会产生重复角色
    bootstrap::seed_roles(store.as_ref()).await.unwrap();
    let roles = store.list_roles().await.unwrap();
    assert_eq!(roles.iter().filter(|r| r.role_name == ADMIN).count(), 1);

    assert!(store.health().await.is_healthy());

    check_credentials_snapshot(store.as_ref()).await;
    check_tenant_isolation(store.as_ref()).await;
    check_email_lookups(store.as_ref()).await;
    check_organization_delete_cascades(store.as_ref()).await;
}

#[tokio::test]
async fn test_memory_store() {
    let store: Arc<dyn CrmStore> = Arc::new(MemoryStore::new());
    assert_eq!(store.backend_name(), "memory");
    run_store_suite(store).await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_postgres_store() {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");

    let mut config = create_test_config().database;
    config.backend = "postgres".to_string();
    config.url = Secret::new(url);

    let store = db::open_store(&config).await.expect("Failed to open store");
    assert_eq!(store.backend_name(), "postgres");
    run_store_suite(store).await;
}
