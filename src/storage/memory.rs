//! In-memory obligation store
//!
//! Holds bills and subscriptions for any number of users without touching
//! disk. Used to plan over freshly imported rows and as a fake in tests.

use std::collections::HashMap;

use crate::error::BillflowResult;
use crate::models::{Bill, Subscription, UserId};

use super::ObligationStore;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    bills: HashMap<UserId, Vec<Bill>>,
    subscriptions: HashMap<UserId, Vec<Subscription>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bill(&mut self, user: UserId, bill: Bill) {
        self.bills.entry(user).or_default().push(bill);
    }

    pub fn add_subscription(&mut self, user: UserId, subscription: Subscription) {
        self.subscriptions.entry(user).or_default().push(subscription);
    }

    pub fn with_bill(mut self, user: UserId, bill: Bill) -> Self {
        self.add_bill(user, bill);
        self
    }

    pub fn with_subscription(mut self, user: UserId, subscription: Subscription) -> Self {
        self.add_subscription(user, subscription);
        self
    }
}

impl ObligationStore for MemoryStore {
    fn list_bills(&self, user: &UserId) -> BillflowResult<Vec<Bill>> {
        Ok(self.bills.get(user).cloned().unwrap_or_default())
    }

    fn list_subscriptions(&self, user: &UserId) -> BillflowResult<Vec<Subscription>> {
        Ok(self.subscriptions.get(user).cloned().unwrap_or_default())
    }
}
