//! Business logic services layer

pub mod account_service;
pub mod activity_service;
pub mod auth_service;
pub mod bootstrap;
pub mod contact_service;
pub mod deal_service;
pub mod lead_service;
pub mod member_service;
pub mod organization_service;

pub use account_service::AccountService;
pub use activity_service::ActivityService;
pub use auth_service::AuthService;
pub use contact_service::ContactService;
pub use deal_service::DealService;
pub use lead_service::LeadService;
pub use member_service::MemberService;
pub use organization_service::OrganizationService;

use crate::{
    error::AppError,
    repository::{AccountStore, ContactStore, CrmStore, DealStore, LeadStore},
};

// 请求体中引用的记录必须属于调用方组织，否则按 400 处理

pub(crate) async fn ensure_account(
    store: &dyn CrmStore,
    org_id: i64,
    account_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(id) = account_id {
        if store.find_account(org_id, id).await?.is_none() {
            return Err(AppError::bad_request("Account not found"));
        }
    }
    Ok(())
}

pub(crate) async fn ensure_contact(
    store: &dyn CrmStore,
    org_id: i64,
    contact_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(id) = contact_id {
        if store.find_contact(org_id, id).await?.is_none() {
            return Err(AppError::bad_request("Contact not found"));
        }
    }
    Ok(())
}

pub(crate) async fn ensure_lead(
    store: &dyn CrmStore,
    org_id: i64,
    lead_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(id) = lead_id {
        if store.find_lead(org_id, id).await?.is_none() {
            return Err(AppError::bad_request("Lead not found"));
        }
    }
    Ok(())
}

pub(crate) async fn ensure_deal(
    store: &dyn CrmStore,
    org_id: i64,
    deal_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(id) = deal_id {
        if store.find_deal(org_id, id).await?.is_none() {
            return Err(AppError::bad_request("Deal not found"));
        }
    }
    Ok(())
}
