//! Per-user JSON repositories for bills and subscriptions
//!
//! Each data file holds every user's records keyed by user ID. Records are
//! cached in memory behind a `RwLock` and written back with `save`.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::error::{BillflowError, BillflowResult};
use crate::models::{Bill, BillId, Subscription, SubscriptionId, UserId};

use super::file_io::{read_json, write_json_atomic};

/// A record that can live in a [`UserScopedRepository`]
pub trait StoredRecord: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash;

    /// Entity name used in error messages
    const ENTITY: &'static str;

    fn record_id(&self) -> Self::Id;
    fn record_name(&self) -> &str;
    fn record_date(&self) -> NaiveDate;

    /// Whether `query` identifies this record by ID
    fn id_matches(&self, query: &str) -> bool;
}

impl StoredRecord for Bill {
    type Id = BillId;
    const ENTITY: &'static str = "Bill";

    fn record_id(&self) -> BillId {
        self.id
    }

    fn record_name(&self) -> &str {
        &self.name
    }

    fn record_date(&self) -> NaiveDate {
        self.due_date
    }

    fn id_matches(&self, query: &str) -> bool {
        self.id.matches(query)
    }
}

impl StoredRecord for Subscription {
    type Id = SubscriptionId;
    const ENTITY: &'static str = "Subscription";

    fn record_id(&self) -> SubscriptionId {
        self.id
    }

    fn record_name(&self) -> &str {
        &self.name
    }

    fn record_date(&self) -> NaiveDate {
        self.next_billing_date
    }

    fn id_matches(&self, query: &str) -> bool {
        self.id.matches(query)
    }
}

/// On-disk layout: records grouped by owner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct UserScopedData<T> {
    #[serde(default)]
    users: BTreeMap<UserId, Vec<T>>,
}

impl<T> Default for UserScopedData<T> {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
        }
    }
}

/// Repository of records owned by users
pub struct UserScopedRepository<T: StoredRecord> {
    path: PathBuf,
    data: RwLock<HashMap<UserId, Vec<T>>>,
}

/// Repository for bill persistence
pub type BillRepository = UserScopedRepository<Bill>;

/// Repository for subscription persistence
pub type SubscriptionRepository = UserScopedRepository<Subscription>;

impl<T: StoredRecord> UserScopedRepository<T> {
    /// Create a new repository backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read_lock(
        &self,
    ) -> BillflowResult<std::sync::RwLockReadGuard<'_, HashMap<UserId, Vec<T>>>> {
        self.data
            .read()
            .map_err(|e| BillflowError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(
        &self,
    ) -> BillflowResult<std::sync::RwLockWriteGuard<'_, HashMap<UserId, Vec<T>>>> {
        self.data
            .write()
            .map_err(|e| BillflowError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load records from disk
    pub fn load(&self) -> BillflowResult<()> {
        let file_data: UserScopedData<T> = read_json(&self.path)?;
        let mut data = self.write_lock()?;

        data.clear();
        data.extend(file_data.users);

        debug!(
            entity = T::ENTITY,
            users = data.len(),
            path = %self.path.display(),
            "loaded records"
        );
        Ok(())
    }

    /// Save records to disk
    pub fn save(&self) -> BillflowResult<()> {
        let data = self.read_lock()?;
        let file_data = UserScopedData {
            users: data
                .iter()
                .filter(|(_, records)| !records.is_empty())
                .map(|(user, records)| (*user, records.clone()))
                .collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// All records owned by `user`, ordered by date then name
    pub fn list(&self, user: &UserId) -> BillflowResult<Vec<T>> {
        let data = self.read_lock()?;
        let mut records = data.get(user).cloned().unwrap_or_default();
        records.sort_by(|a, b| {
            a.record_date()
                .cmp(&b.record_date())
                .then_with(|| a.record_name().cmp(b.record_name()))
        });
        Ok(records)
    }

    /// Get a record by ID
    pub fn get(&self, user: &UserId, id: T::Id) -> BillflowResult<Option<T>> {
        let data = self.read_lock()?;
        Ok(data
            .get(user)
            .and_then(|records| records.iter().find(|r| r.record_id() == id))
            .cloned())
    }

    /// Find a record by ID (full, display form, or prefix) or by name
    /// (case-insensitive)
    pub fn find(&self, user: &UserId, query: &str) -> BillflowResult<Option<T>> {
        let data = self.read_lock()?;
        let Some(records) = data.get(user) else {
            return Ok(None);
        };

        if let Some(record) = records.iter().find(|r| r.id_matches(query)) {
            return Ok(Some(record.clone()));
        }

        let query = query.trim().to_lowercase();
        Ok(records
            .iter()
            .find(|r| r.record_name().to_lowercase() == query)
            .cloned())
    }

    /// Insert or update a record
    pub fn upsert(&self, user: &UserId, record: T) -> BillflowResult<()> {
        let mut data = self.write_lock()?;
        let records = data.entry(*user).or_default();

        match records.iter_mut().find(|r| r.record_id() == record.record_id()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    /// Delete a record, returning whether it existed
    pub fn delete(&self, user: &UserId, id: T::Id) -> BillflowResult<bool> {
        let mut data = self.write_lock()?;
        let Some(records) = data.get_mut(user) else {
            return Ok(false);
        };

        let before = records.len();
        records.retain(|r| r.record_id() != id);
        Ok(records.len() != before)
    }

    /// Check if `name` is already used by another of the user's records
    pub fn name_exists(&self, user: &UserId, name: &str, exclude: Option<T::Id>) -> BillflowResult<bool> {
        let data = self.read_lock()?;
        let name = name.trim().to_lowercase();
        Ok(data.get(user).is_some_and(|records| {
            records
                .iter()
                .any(|r| r.record_name().to_lowercase() == name && Some(r.record_id()) != exclude)
        }))
    }

    /// Count records owned by `user`
    pub fn count(&self, user: &UserId) -> BillflowResult<usize> {
        let data = self.read_lock()?;
        Ok(data.get(user).map_or(0, Vec::len))
    }
}
