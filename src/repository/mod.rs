//! Storage layer
//!
//! One trait per aggregate. Every tenant-owned operation takes the
//! organization id explicitly, so a row owned by another organization is
//! simply not found. Two backends implement the full set: [`PgStore`]
//! (PostgreSQL through sqlx) and [`MemoryStore`] (in-process, used by tests
//! and the `memory` backend).
//!
//! Deleting a row removes what it owns: an organization takes its members and
//! records, a member takes the records it created, a lead takes its
//! activities. Optional references to a deleted row are cleared.

pub mod account_repo;
pub mod activity_repo;
pub mod contact_repo;
pub mod deal_repo;
pub mod lead_repo;
pub mod member_repo;
pub mod memory;
pub mod organization_repo;
pub mod postgres;
pub mod role_repo;

pub use account_repo::AccountStore;
pub use activity_repo::ActivityStore;
pub use contact_repo::ContactStore;
pub use deal_repo::DealStore;
pub use lead_repo::LeadStore;
pub use member_repo::MemberStore;
pub use memory::MemoryStore;
pub use organization_repo::OrganizationStore;
pub use postgres::PgStore;
pub use role_repo::RoleStore;

use crate::db::HealthStatus;
use async_trait::async_trait;

/// Backend liveness, reported by `/ready`
#[async_trait]
pub trait StoreHealth: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn health(&self) -> HealthStatus;
}

/// The full storage surface the services depend on
pub trait CrmStore:
    OrganizationStore
    + RoleStore
    + MemberStore
    + LeadStore
    + ContactStore
    + AccountStore
    + DealStore
    + ActivityStore
    + StoreHealth
{
}

impl<T> CrmStore for T where
    T: OrganizationStore
        + RoleStore
        + MemberStore
        + LeadStore
        + ContactStore
        + AccountStore
        + DealStore
        + ActivityStore
        + StoreHealth
{
}
