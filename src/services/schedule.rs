//! Payment schedule builder
//!
//! Buckets a month's obligations by date, after optionally moving every
//! payment to a single early or late anchor day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::Settings;
use crate::models::{DistributionPolicy, Money, Obligation, ObligationRef, PaymentSchedule, YearMonth};

/// Builds `PaymentSchedule` entries for a month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleBuilder {
    early_day: u32,
    late_day: u32,
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self {
            early_day: 5,
            late_day: 25,
        }
    }
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the anchor days configured in settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new().with_anchor_days(settings.early_day, settings.late_day)
    }

    /// Override the days the early and late policies move payments to
    pub fn with_anchor_days(mut self, early_day: u32, late_day: u32) -> Self {
        self.early_day = early_day;
        self.late_day = late_day;
        self
    }

    /// The date an obligation due on `due_date` is paid under `policy`
    ///
    /// Anchor days past the end of a short month land on its last day.
    pub fn effective_date(&self, due_date: NaiveDate, month: YearMonth, policy: DistributionPolicy) -> NaiveDate {
        match policy {
            DistributionPolicy::Balanced => due_date,
            DistributionPolicy::Early => month.day(self.early_day),
            DistributionPolicy::Late => month.day(self.late_day),
        }
    }

    /// Schedule every obligation due within `month`
    ///
    /// Entries are sorted by date; items keep their input order. Returns an
    /// empty vector when nothing is due in the month.
    pub fn build(
        &self,
        obligations: &[Obligation],
        month: YearMonth,
        policy: DistributionPolicy,
    ) -> Vec<PaymentSchedule> {
        let mut buckets: BTreeMap<NaiveDate, Vec<ObligationRef>> = BTreeMap::new();

        for obligation in obligations.iter().filter(|o| month.contains(o.due_date())) {
            let date = self.effective_date(obligation.due_date(), month, policy);
            buckets
                .entry(date)
                .or_default()
                .push(ObligationRef::scheduled_on(obligation, date));
        }

        let schedule: Vec<PaymentSchedule> = buckets
            .into_iter()
            .map(|(date, items)| PaymentSchedule::new(date, items))
            .collect();

        debug!(
            month = %month,
            policy = %policy,
            obligations = obligations.len(),
            entries = schedule.len(),
            "built payment schedule"
        );
        schedule
    }

    /// Recurring obligations that have no due date inside `month`
    ///
    /// They still cost money every month; the projector spreads their total
    /// over the days left open by the schedule.
    pub fn unscheduled(&self, obligations: &[Obligation], month: YearMonth) -> Vec<ObligationRef> {
        obligations
            .iter()
            .filter(|o| o.recurring() && !month.contains(o.due_date()))
            .map(ObligationRef::new)
            .collect()
    }

    /// Monthly-equivalent cost of everything `unscheduled` returns
    ///
    /// A yearly subscription due in another month contributes a twelfth of
    /// its charge, not the whole charge.
    pub fn unscheduled_total(&self, obligations: &[Obligation], month: YearMonth) -> Money {
        obligations
            .iter()
            .filter(|o| o.recurring() && !month.contains(o.due_date()))
            .map(Obligation::monthly_cost)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{schedule_total, Bill, BillingCycle, Subscription};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bill(name: &str, cents: i64, due: NaiveDate) -> Obligation {
        Obligation::Bill(Bill::new(name, "Utilities", Money::from_cents(cents), due))
    }

    fn march() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    fn sample() -> Vec<Obligation> {
        vec![
            bill("A", 10000, date(2024, 3, 10)),
            bill("B", 5000, date(2024, 3, 10)),
            bill("C", 3000, date(2024, 3, 22)),
        ]
    }

    #[test]
    fn test_balanced_groups_by_due_date() {
        let schedule = ScheduleBuilder::new().build(&sample(), march(), DistributionPolicy::Balanced);

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].date, date(2024, 3, 10));
        assert_eq!(schedule[0].total_amount.cents(), 15000);
        assert_eq!(schedule[0].items.len(), 2);
        assert_eq!(schedule[1].date, date(2024, 3, 22));
        assert_eq!(schedule[1].total_amount.cents(), 3000);
    }

    #[test]
    fn test_balanced_keeps_due_dates() {
        let schedule = ScheduleBuilder::new().build(&sample(), march(), DistributionPolicy::Balanced);
        for entry in &schedule {
            for item in &entry.items {
                assert_eq!(item.due_date, entry.date);
                assert!(!item.is_moved());
            }
        }
    }

    #[test]
    fn test_early_collapses_to_day_five() {
        let schedule = ScheduleBuilder::new().build(&sample(), march(), DistributionPolicy::Early);

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].date, date(2024, 3, 5));
        assert_eq!(schedule[0].total_amount.cents(), 18000);
        assert!(schedule[0].items.iter().all(|i| i.is_moved()));
    }

    #[test]
    fn test_late_collapses_to_day_twenty_five() {
        let schedule = ScheduleBuilder::new().build(&sample(), march(), DistributionPolicy::Late);

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].date, date(2024, 3, 25));
        assert_eq!(schedule[0].total_amount.cents(), 18000);
    }

    #[test]
    fn test_filters_to_month_inclusive() {
        let obligations = vec![
            bill("Before", 100, date(2024, 2, 29)),
            bill("First", 200, date(2024, 3, 1)),
            bill("Last", 300, date(2024, 3, 31)),
            bill("After", 400, date(2024, 4, 1)),
        ];
        let schedule = ScheduleBuilder::new().build(&obligations, march(), DistributionPolicy::Balanced);

        let dates: Vec<_> = schedule.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 3, 31)]);
        assert_eq!(schedule_total(&schedule).cents(), 500);
    }

    #[test]
    fn test_empty_when_nothing_due() {
        let schedule = ScheduleBuilder::new().build(&[], march(), DistributionPolicy::Early);
        assert!(schedule.is_empty());

        let april_only = vec![bill("April", 100, date(2024, 4, 2))];
        assert!(ScheduleBuilder::new()
            .build(&april_only, march(), DistributionPolicy::Late)
            .is_empty());
    }

    #[test]
    fn test_anchor_clamps_in_short_month() {
        let feb = YearMonth::new(2023, 2).unwrap();
        let obligations = vec![bill("Rent", 100, date(2023, 2, 1))];
        let schedule = ScheduleBuilder::new()
            .with_anchor_days(5, 31)
            .build(&obligations, feb, DistributionPolicy::Late);

        assert_eq!(schedule[0].date, date(2023, 2, 28));
    }

    #[test]
    fn test_sorted_ascending_regardless_of_input_order() {
        let obligations = vec![
            bill("Late", 100, date(2024, 3, 28)),
            bill("Early", 100, date(2024, 3, 2)),
            bill("Mid", 100, date(2024, 3, 15)),
        ];
        let schedule = ScheduleBuilder::new().build(&obligations, march(), DistributionPolicy::Balanced);
        let dates: Vec<_> = schedule.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 2), date(2024, 3, 15), date(2024, 3, 28)]);
    }

    #[test]
    fn test_idempotent() {
        let builder = ScheduleBuilder::new();
        for policy in DistributionPolicy::ALL {
            assert_eq!(
                builder.build(&sample(), march(), policy),
                builder.build(&sample(), march(), policy)
            );
        }
    }

    #[test]
    fn test_unscheduled_recurring_only() {
        let mut one_off = Bill::new("Repair", "Transportation", Money::from_cents(500), date(2024, 2, 3));
        one_off.recurring = false;
        let obligations = vec![
            bill("In month", 100, date(2024, 3, 3)),
            bill("Recurring elsewhere", 200, date(2024, 4, 3)),
            Obligation::Bill(one_off),
            Obligation::Subscription(Subscription::new(
                "Cloud",
                "Software",
                Money::from_cents(300),
                date(2024, 1, 9),
            )),
        ];

        let unscheduled = ScheduleBuilder::new().unscheduled(&obligations, march());
        let names: Vec<_> = unscheduled.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Recurring elsewhere", "Cloud"]);
    }

    #[test]
    fn test_unscheduled_total_uses_monthly_equivalent() {
        let mut yearly = Subscription::new("Domain", "Software", Money::from_cents(1200), date(2024, 7, 1));
        yearly.billing_cycle = BillingCycle::Yearly;
        let obligations = vec![
            bill("In month", 100, date(2024, 3, 3)),
            bill("Next month", 2500, date(2024, 4, 3)),
            Obligation::Subscription(yearly),
        ];

        let total = ScheduleBuilder::new().unscheduled_total(&obligations, march());
        assert_eq!(total.cents(), 2600);
    }
}
