//! Subscription service
//!
//! CRUD for one user's subscriptions plus the lifecycle operations the
//! insights rely on: price changes, usage tracking and cancellation.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{BillflowError, BillflowResult};
use crate::models::{BillingCycle, Money, Subscription, UserId};
use crate::storage::Storage;

/// Service for subscription management
pub struct SubscriptionService<'a> {
    storage: &'a Storage,
    user: UserId,
}

impl<'a> SubscriptionService<'a> {
    /// Create a new subscription service acting for `user`
    pub fn new(storage: &'a Storage, user: UserId) -> Self {
        Self { storage, user }
    }

    /// Create a new subscription
    pub fn create(
        &self,
        name: &str,
        category: &str,
        amount: Money,
        next_billing_date: NaiveDate,
        billing_cycle: BillingCycle,
    ) -> BillflowResult<Subscription> {
        let mut subscription = Subscription::new(name.trim(), category.trim(), amount, next_billing_date);
        subscription.billing_cycle = billing_cycle;
        self.insert(subscription)
    }

    /// Store an already-built subscription after validating it
    pub fn insert(&self, subscription: Subscription) -> BillflowResult<Subscription> {
        subscription
            .validate()
            .map_err(|e| BillflowError::Validation(e.to_string()))?;

        if self
            .storage
            .subscriptions
            .name_exists(&self.user, &subscription.name, None)?
        {
            return Err(BillflowError::Duplicate {
                entity_type: "Subscription",
                identifier: subscription.name.clone(),
            });
        }

        self.storage.subscriptions.upsert(&self.user, subscription.clone())?;
        self.storage.subscriptions.save()?;

        info!(
            user = %self.user,
            subscription = %subscription.id,
            name = %subscription.name,
            "created subscription"
        );
        Ok(subscription)
    }

    /// Find a subscription by name or ID prefix
    pub fn find(&self, identifier: &str) -> BillflowResult<Option<Subscription>> {
        self.storage.subscriptions.find(&self.user, identifier)
    }

    /// All subscriptions, ordered by next billing date
    pub fn list(&self, include_cancelled: bool) -> BillflowResult<Vec<Subscription>> {
        let subscriptions = self.storage.subscriptions.list(&self.user)?;
        Ok(subscriptions
            .into_iter()
            .filter(|s| include_cancelled || s.active)
            .collect())
    }

    /// Sum of monthly-equivalent cost over active subscriptions
    pub fn monthly_total(&self) -> BillflowResult<Money> {
        Ok(self.list(false)?.iter().map(Subscription::monthly_cost).sum())
    }

    /// Record a new price; the old one is kept for price alerts
    pub fn change_price(&self, identifier: &str, amount: Money) -> BillflowResult<Subscription> {
        self.modify(identifier, |s| s.change_price(amount), "changed subscription price")
    }

    /// Record how many times per month the subscription is used
    pub fn record_usage(&self, identifier: &str, uses_per_month: u32) -> BillflowResult<Subscription> {
        self.modify(
            identifier,
            |s| {
                s.usage_per_month = Some(uses_per_month);
                s.updated_at = chrono::Utc::now();
            },
            "recorded subscription usage",
        )
    }

    /// Cancel a subscription; it stays on record but is no longer planned
    pub fn cancel(&self, identifier: &str) -> BillflowResult<Subscription> {
        self.modify(identifier, Subscription::cancel, "cancelled subscription")
    }

    /// Delete a subscription
    pub fn remove(&self, identifier: &str) -> BillflowResult<Subscription> {
        let subscription = self
            .find(identifier)?
            .ok_or_else(|| BillflowError::subscription_not_found(identifier))?;

        self.storage.subscriptions.delete(&self.user, subscription.id)?;
        self.storage.subscriptions.save()?;

        info!(user = %self.user, subscription = %subscription.id, "removed subscription");
        Ok(subscription)
    }

    fn modify(
        &self,
        identifier: &str,
        change: impl FnOnce(&mut Subscription),
        message: &str,
    ) -> BillflowResult<Subscription> {
        let mut subscription = self
            .find(identifier)?
            .ok_or_else(|| BillflowError::subscription_not_found(identifier))?;

        change(&mut subscription);
        subscription
            .validate()
            .map_err(|e| BillflowError::Validation(e.to_string()))?;

        self.storage.subscriptions.upsert(&self.user, subscription.clone())?;
        self.storage.subscriptions.save()?;

        info!(user = %self.user, subscription = %subscription.id, "{}", message);
        Ok(subscription)
    }
}
