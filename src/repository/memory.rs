//! In-process store
//!
//! Each aggregate lives in its own id-keyed table. Relations are plain id
//! fields; there are no back-pointers to keep in sync.

use crate::{
    db::HealthStatus,
    models::{
        account::Account, activity::Activity, contact::Contact, deal::Deal, lead::Lead,
        member::Member, organization::Organization, role::Role, MonthlyCount,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::StoreHealth;

/// Id-keyed table with its own sequence, like a BIGSERIAL column
pub(crate) struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    pub(crate) fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn insert(&mut self, id: i64, row: T) -> T {
        self.rows.insert(id, row.clone());
        row
    }

    pub(crate) fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: i64) -> Option<T> {
        self.rows.remove(&id)
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }

    pub(crate) fn ids_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<i64> {
        self.rows
            .iter()
            .filter(|(_, row)| predicate(row))
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Rows that belong to one organization
pub(crate) trait TenantOwned {
    fn org_id(&self) -> i64;
}

macro_rules! tenant_owned {
    ($($ty:ty),+) => {
        $(impl TenantOwned for $ty {
            fn org_id(&self) -> i64 {
                self.org_id
            }
        })+
    };
}

tenant_owned!(Member, Lead, Contact, Account, Deal, Activity);

impl<T: Clone + TenantOwned> Table<T> {
    /// Row by id, only when it belongs to `org_id`
    pub(crate) fn owned(&self, org_id: i64, id: i64) -> Option<&T> {
        self.get(id).filter(|row| row.org_id() == org_id)
    }

    pub(crate) fn owned_mut(&mut self, org_id: i64, id: i64) -> Option<&mut T> {
        self.get_mut(id).filter(|row| row.org_id() == org_id)
    }

    pub(crate) fn list_owned(&self, org_id: i64) -> Vec<T> {
        self.values()
            .filter(|row| row.org_id() == org_id)
            .cloned()
            .collect()
    }
}

#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) organizations: Table<Organization>,
    pub(crate) roles: Table<Role>,
    pub(crate) members: Table<Member>,
    pub(crate) leads: Table<Lead>,
    pub(crate) contacts: Table<Contact>,
    pub(crate) accounts: Table<Account>,
    pub(crate) deals: Table<Deal>,
    pub(crate) activities: Table<Activity>,
}

impl Tables {
    pub(crate) fn drop_lead(&mut self, id: i64) -> bool {
        let removed = self.leads.remove(id).is_some();
        for activity_id in self.activities.ids_where(|a| a.lead_id == Some(id)) {
            self.activities.remove(activity_id);
        }
        removed
    }

    pub(crate) fn drop_account(&mut self, id: i64) -> bool {
        let removed = self.accounts.remove(id).is_some();
        for contact in self.contacts.values_mut().filter(|c| c.account_id == Some(id)) {
            contact.account_id = None;
        }
        for deal in self.deals.values_mut().filter(|d| d.account_id == Some(id)) {
            deal.account_id = None;
        }
        for activity in self.activities.values_mut().filter(|a| a.account_id == Some(id)) {
            activity.account_id = None;
        }
        removed
    }

    pub(crate) fn drop_contact(&mut self, id: i64) -> bool {
        let removed = self.contacts.remove(id).is_some();
        for deal in self.deals.values_mut().filter(|d| d.contact_id == Some(id)) {
            deal.contact_id = None;
        }
        for activity in self.activities.values_mut().filter(|a| a.contact_id == Some(id)) {
            activity.contact_id = None;
        }
        removed
    }

    pub(crate) fn drop_deal(&mut self, id: i64) -> bool {
        let removed = self.deals.remove(id).is_some();
        for activity in self.activities.values_mut().filter(|a| a.deal_id == Some(id)) {
            activity.deal_id = None;
        }
        removed
    }

    /// Remove a member together with every record it created
    pub(crate) fn drop_member(&mut self, id: i64) -> bool {
        for activity_id in self.activities.ids_where(|a| a.member_id == id) {
            self.activities.remove(activity_id);
        }
        for deal_id in self.deals.ids_where(|d| d.member_id == id) {
            self.drop_deal(deal_id);
        }
        for contact_id in self.contacts.ids_where(|c| c.member_id == id) {
            self.drop_contact(contact_id);
        }
        for account_id in self.accounts.ids_where(|a| a.member_id == id) {
            self.drop_account(account_id);
        }
        for lead_id in self.leads.ids_where(|l| l.member_id == id) {
            self.drop_lead(lead_id);
        }
        self.members.remove(id).is_some()
    }

    /// Remove an organization together with its members and records
    pub(crate) fn drop_organization(&mut self, id: i64) -> bool {
        for member_id in self.members.ids_where(|m| m.org_id == id) {
            self.drop_member(member_id);
        }
        // Rows stamped with this org but created by a member of another org
        for activity_id in self.activities.ids_where(|a| a.org_id == id) {
            self.activities.remove(activity_id);
        }
        for deal_id in self.deals.ids_where(|d| d.org_id == id) {
            self.drop_deal(deal_id);
        }
        for contact_id in self.contacts.ids_where(|c| c.org_id == id) {
            self.drop_contact(contact_id);
        }
        for account_id in self.accounts.ids_where(|a| a.org_id == id) {
            self.drop_account(account_id);
        }
        for lead_id in self.leads.ids_where(|l| l.org_id == id) {
            self.drop_lead(lead_id);
        }
        self.organizations.remove(id).is_some()
    }
}

/// Count rows per calendar month of their creation time, oldest first
pub(crate) fn monthly_counts<'a>(
    created: impl Iterator<Item = &'a DateTime<Utc>>,
) -> Vec<MonthlyCount> {
    let mut buckets: BTreeMap<(i32, i32), i64> = BTreeMap::new();
    for at in created {
        *buckets.entry((at.year(), at.month() as i32)).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|((year, month), count)| MonthlyCount { year, month, count })
        .collect()
}

/// In-process store backed by [`Tables`] behind one async lock
#[derive(Default)]
pub struct MemoryStore {
    pub(crate) tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health(&self) -> HealthStatus {
        let _tables = self.tables.read().await;
        HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_table_ids_are_sequential() {
        let mut table: Table<String> = Table::default();
        let first = table.allocate_id();
        let second = table.allocate_id();
        assert_eq!((first, second), (1, 2));

        table.insert(first, "a".to_string());
        table.remove(first);
        // Ids are never reused
        assert_eq!(table.allocate_id(), 3);
    }

    #[test]
    fn test_monthly_counts_grouping() {
        let stamps = [
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap(),
        ];
        let counts = monthly_counts(stamps.iter());
        assert_eq!(
            counts,
            vec![
                MonthlyCount { year: 2023, month: 12, count: 1 },
                MonthlyCount { year: 2024, month: 1, count: 2 },
            ]
        );
    }
}
