//! Monthly planning service
//!
//! Reads a user's obligations through the data-access interface and runs the
//! schedule builder, cash-flow projector and category aggregator over them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::BillflowResult;
use crate::models::{
    schedule_total, CashFlowProjection, CategoryTotal, DistributionPolicy, Money, Obligation,
    ObligationRef, PaymentSchedule, UserId, YearMonth,
};
use crate::storage::ObligationStore;

use super::category_totals::CategoryAggregator;
use super::projection::{lowest_point, shortfall_days, CashFlowProjector};
use super::schedule::ScheduleBuilder;

/// Everything computed for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPlan {
    pub month: YearMonth,
    pub policy: DistributionPolicy,
    pub monthly_income: Money,
    pub schedule: Vec<PaymentSchedule>,
    pub projection: Vec<CashFlowProjection>,
    pub category_totals: Vec<CategoryTotal>,
    /// Recurring obligations with no due date in the month
    pub unscheduled: Vec<ObligationRef>,
    pub scheduled_total: Money,
    pub unscheduled_total: Money,
    pub ending_balance: Money,
    pub lowest_balance: Money,
    pub lowest_balance_date: NaiveDate,
}

impl MonthlyPlan {
    /// Number of days that end below zero
    pub fn shortfall_day_count(&self) -> usize {
        shortfall_days(&self.projection).len()
    }

    /// Scheduled plus unscheduled spend
    pub fn total_outflow(&self) -> Money {
        self.scheduled_total + self.unscheduled_total
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty() && self.unscheduled.is_empty()
    }
}

/// Service for building monthly plans
pub struct PlannerService<'a> {
    store: &'a dyn ObligationStore,
    scheduler: ScheduleBuilder,
    projector: CashFlowProjector,
    aggregator: CategoryAggregator,
}

impl<'a> PlannerService<'a> {
    /// Create a new planner reading from `store`, configured by `settings`
    pub fn new(store: &'a dyn ObligationStore, settings: &Settings) -> Self {
        Self {
            store,
            scheduler: ScheduleBuilder::from_settings(settings),
            projector: CashFlowProjector::from_settings(settings),
            aggregator: CategoryAggregator::new(settings.categories.clone()),
        }
    }

    /// Obligations the planner would schedule for `user`
    pub fn obligations_for(&self, user: &UserId) -> BillflowResult<Vec<Obligation>> {
        let obligations = self.store.list_obligations(user)?;
        debug!(user = %user, count = obligations.len(), "loaded obligations");
        Ok(obligations)
    }

    /// Plan `month` for `user`
    pub fn plan_for_user(
        &self,
        user: &UserId,
        month: YearMonth,
        monthly_income: Money,
        policy: DistributionPolicy,
    ) -> BillflowResult<MonthlyPlan> {
        let obligations = self.obligations_for(user)?;
        let plan = self.plan(&obligations, month, monthly_income, policy)?;

        info!(
            user = %user,
            month = %month,
            policy = %policy,
            scheduled = %plan.scheduled_total,
            ending_balance = %plan.ending_balance,
            "planned month"
        );
        Ok(plan)
    }

    /// Plan `month` over an explicit obligation list
    ///
    /// Cancelled subscriptions are skipped.
    pub fn plan(
        &self,
        obligations: &[Obligation],
        month: YearMonth,
        monthly_income: Money,
        policy: DistributionPolicy,
    ) -> BillflowResult<MonthlyPlan> {
        let active: Vec<Obligation> = obligations
            .iter()
            .filter(|o| o.is_active())
            .cloned()
            .collect();
        if active.len() != obligations.len() {
            debug!(skipped = obligations.len() - active.len(), "skipped inactive subscriptions");
        }

        let schedule = self.scheduler.build(&active, month, policy);
        let unscheduled = self.scheduler.unscheduled(&active, month);
        let unscheduled_total = self.scheduler.unscheduled_total(&active, month);

        let projection = self
            .projector
            .clone()
            .with_unscheduled(unscheduled_total)
            .project(&schedule, month, monthly_income, policy)?;
        let category_totals = self.aggregator.aggregate(&schedule);

        let ending_balance = projection
            .last()
            .map(|p| p.running_balance)
            .unwrap_or_default();
        let (lowest_balance, lowest_balance_date) = lowest_point(&projection)
            .map(|p| (p.running_balance, p.date))
            .unwrap_or((Money::zero(), month.first_day()));

        Ok(MonthlyPlan {
            month,
            policy,
            monthly_income,
            scheduled_total: schedule_total(&schedule),
            schedule,
            projection,
            category_totals,
            unscheduled,
            unscheduled_total,
            ending_balance,
            lowest_balance,
            lowest_balance_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bill, Subscription};
    use crate::storage::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dollars(n: i64) -> Money {
        Money::from_cents(n * 100)
    }

    fn store(user: UserId) -> MemoryStore {
        let mut cancelled = Subscription::new("Old gym", "Health & Fitness", dollars(40), date(2024, 3, 8));
        cancelled.cancel();

        MemoryStore::new()
            .with_bill(user, Bill::new("Rent", "Housing", dollars(1200), date(2024, 3, 1)))
            .with_bill(user, Bill::new("Power", "utilities", dollars(90), date(2024, 3, 18)))
            .with_bill(user, Bill::new("Car insurance", "Insurance", dollars(60), date(2024, 4, 2)))
            .with_subscription(user, Subscription::new("Netflix", "Streaming", dollars(15), date(2024, 3, 18)))
            .with_subscription(user, cancelled)
    }

    #[test]
    fn test_plan_for_user() {
        let user = UserId::new();
        let store = store(user);
        let settings = Settings::default();
        let planner = PlannerService::new(&store, &settings);

        let plan = planner
            .plan_for_user(&user, YearMonth::new(2024, 3).unwrap(), dollars(3000), DistributionPolicy::Balanced)
            .unwrap();

        assert_eq!(plan.schedule.len(), 2);
        assert_eq!(plan.scheduled_total, dollars(1305));
        assert_eq!(plan.unscheduled_total, dollars(60));
        assert_eq!(plan.unscheduled.len(), 1);
        assert_eq!(plan.projection.len(), 31);
        assert_eq!(plan.ending_balance, dollars(3000 - 1305 - 60));
        assert_eq!(plan.total_outflow(), dollars(1365));

        let categories: Vec<_> = plan.category_totals.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["Housing", "Utilities", "Streaming"]);
        let sum: Money = plan.category_totals.iter().map(|c| c.amount).sum();
        assert_eq!(sum, plan.scheduled_total);
    }

    #[test]
    fn test_cancelled_subscriptions_excluded() {
        let user = UserId::new();
        let store = store(user);
        let settings = Settings::default();
        let plan = PlannerService::new(&store, &settings)
            .plan_for_user(&user, YearMonth::new(2024, 3).unwrap(), Money::zero(), DistributionPolicy::Early)
            .unwrap();

        assert!(plan
            .schedule
            .iter()
            .flat_map(|s| s.items.iter())
            .all(|i| i.name != "Old gym"));
    }

    #[test]
    fn test_lowest_balance_reported() {
        let user = UserId::new();
        let store = store(user);
        let settings = Settings::default();
        let plan = PlannerService::new(&store, &settings)
            .plan_for_user(&user, YearMonth::new(2024, 3).unwrap(), dollars(1000), DistributionPolicy::Late)
            .unwrap();

        // Everything lands on the 25th, and the unscheduled $60 spreads over the 22nd-31st
        assert!(plan.lowest_balance.is_negative());
        assert_eq!(plan.lowest_balance, plan.ending_balance);
        assert!(plan.shortfall_day_count() > 0);
    }

    #[test]
    fn test_empty_user() {
        let store = MemoryStore::new();
        let settings = Settings::default();
        let plan = PlannerService::new(&store, &settings)
            .plan_for_user(&UserId::new(), YearMonth::new(2024, 2).unwrap(), dollars(100), DistributionPolicy::Balanced)
            .unwrap();

        assert!(plan.is_empty());
        assert_eq!(plan.projection.len(), 29);
        assert_eq!(plan.lowest_balance, dollars(50));
        assert_eq!(plan.lowest_balance_date, date(2024, 2, 1));
        assert_eq!(plan.ending_balance, dollars(100));
    }

    #[test]
    fn test_settings_anchor_days_used() {
        let user = UserId::new();
        let store = store(user);
        let settings = Settings {
            early_day: 3,
            ..Settings::default()
        };
        let plan = PlannerService::new(&store, &settings)
            .plan_for_user(&user, YearMonth::new(2024, 3).unwrap(), Money::zero(), DistributionPolicy::Early)
            .unwrap();

        assert_eq!(plan.schedule.len(), 1);
        assert_eq!(plan.schedule[0].date, date(2024, 3, 3));
    }
}
