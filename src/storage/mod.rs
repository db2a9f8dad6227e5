//! Storage layer for billflow
//!
//! Provides the data-access interface the planner reads obligations through,
//! a JSON file implementation of it, an in-memory implementation, and the
//! session providers that name the current user.

pub mod file_io;
pub mod memory;
pub mod records;
pub mod repository;
pub mod session;

pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use memory::MemoryStore;
pub use records::{BillRecord, RawAmount, SubscriptionRecord};
pub use repository::{BillRepository, SubscriptionRepository, UserScopedRepository};
pub use session::{EnvSession, SessionChain, SessionProvider, SettingsSession, StaticSession};

use crate::config::paths::BillflowPaths;
use crate::error::BillflowResult;
use crate::models::{Bill, Obligation, Subscription, UserId};

/// Read access to a user's bills and subscriptions
pub trait ObligationStore {
    fn list_bills(&self, user: &UserId) -> BillflowResult<Vec<Bill>>;

    fn list_subscriptions(&self, user: &UserId) -> BillflowResult<Vec<Subscription>>;

    /// Bills followed by subscriptions, as one list
    fn list_obligations(&self, user: &UserId) -> BillflowResult<Vec<Obligation>> {
        let mut obligations: Vec<Obligation> = self
            .list_bills(user)?
            .into_iter()
            .map(Obligation::Bill)
            .collect();
        obligations.extend(
            self.list_subscriptions(user)?
                .into_iter()
                .map(Obligation::Subscription),
        );
        Ok(obligations)
    }
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BillflowPaths,
    pub bills: BillRepository,
    pub subscriptions: SubscriptionRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BillflowPaths) -> BillflowResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            bills: BillRepository::new(paths.bills_file()),
            subscriptions: SubscriptionRepository::new(paths.subscriptions_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &BillflowPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> BillflowResult<()> {
        self.bills.load()?;
        self.subscriptions.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> BillflowResult<()> {
        self.bills.save()?;
        self.subscriptions.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

impl ObligationStore for Storage {
    fn list_bills(&self, user: &UserId) -> BillflowResult<Vec<Bill>> {
        self.bills.list(user)
    }

    fn list_subscriptions(&self, user: &UserId) -> BillflowResult<Vec<Subscription>> {
        self.subscriptions.list(user)
    }
}
