//! Cash-flow projection
//!
//! Simulates a running balance over every day of a month from the payment
//! schedule, an income model and an optional pool of recurring spend that is
//! not tied to a date this month.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{BillflowError, BillflowResult};
use crate::models::{CashFlowProjection, DistributionPolicy, Money, PaymentSchedule, YearMonth};

/// When income arrives during a month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeModel {
    paydays: Vec<u32>,
}

impl Default for IncomeModel {
    /// Two equal paychecks on the 1st and the 15th
    fn default() -> Self {
        Self {
            paydays: vec![1, 15],
        }
    }
}

impl IncomeModel {
    /// Income split evenly over the given days of the month
    pub fn new(mut paydays: Vec<u32>) -> Self {
        paydays.sort_unstable();
        paydays.dedup();
        Self { paydays }
    }

    pub fn paydays(&self) -> &[u32] {
        &self.paydays
    }

    /// Income per date for `month`
    ///
    /// Any remainder cent goes to the earliest payday so the month adds up to
    /// exactly `monthly_income`. Paydays past the month's end fall on its
    /// last day.
    pub fn distribute(&self, month: YearMonth, monthly_income: Money) -> BillflowResult<BTreeMap<NaiveDate, Money>> {
        if self.paydays.is_empty() {
            if monthly_income.is_zero() {
                return Ok(BTreeMap::new());
            }
            return Err(BillflowError::InvalidInput(
                "income model has no paydays".into(),
            ));
        }

        let mut income = BTreeMap::new();
        for (day, amount) in self
            .paydays
            .iter()
            .zip(monthly_income.split_even(self.paydays.len()))
        {
            *income.entry(month.day(*day)).or_insert_with(Money::zero) += amount;
        }
        Ok(income)
    }
}

/// Projects a day-by-day running balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashFlowProjector {
    income: IncomeModel,
    window_days: u32,
    unscheduled: Money,
}

impl Default for CashFlowProjector {
    fn default() -> Self {
        Self {
            income: IncomeModel::default(),
            window_days: 10,
            unscheduled: Money::zero(),
        }
    }
}

impl CashFlowProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use paydays and window width from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .with_income_model(IncomeModel::new(settings.paydays.clone()))
            .with_window_days(settings.window_days)
    }

    pub fn with_income_model(mut self, income: IncomeModel) -> Self {
        self.income = income;
        self
    }

    /// Number of days the early/late policies spread unscheduled spend over
    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days.max(1);
        self
    }

    /// Recurring spend with no date in the projected month
    pub fn with_unscheduled(mut self, amount: Money) -> Self {
        self.unscheduled = amount;
        self
    }

    /// Project every day of `month`
    ///
    /// A day's expense is its scheduled total. The unscheduled pool is spread
    /// over the policy's window (first days for `early`, last days for
    /// `late`, the whole month for `balanced`), but only onto days without a
    /// scheduled payment. When every window day is already scheduled the
    /// pool is spread over the whole window instead.
    pub fn project(
        &self,
        schedule: &[PaymentSchedule],
        month: YearMonth,
        monthly_income: Money,
        policy: DistributionPolicy,
    ) -> BillflowResult<Vec<CashFlowProjection>> {
        if monthly_income.is_negative() {
            return Err(BillflowError::InvalidInput(format!(
                "monthly income cannot be negative ({})",
                monthly_income
            )));
        }
        if self.unscheduled.is_negative() {
            return Err(BillflowError::InvalidInput(format!(
                "unscheduled spend cannot be negative ({})",
                self.unscheduled
            )));
        }

        let scheduled = scheduled_by_day(schedule, month)?;
        let income = self.income.distribute(month, monthly_income)?;
        let synthetic = self.synthetic_by_day(&scheduled, month, policy);

        let mut running_balance = Money::zero();
        let projection: Vec<CashFlowProjection> = month
            .days()
            .map(|date| {
                let income_for_day = income.get(&date).copied().unwrap_or_default();
                let expense_for_day = scheduled.get(&date).copied().unwrap_or_default()
                    + synthetic.get(&date).copied().unwrap_or_default();
                running_balance += income_for_day - expense_for_day;

                CashFlowProjection {
                    date,
                    income_for_day,
                    expense_for_day,
                    running_balance,
                }
            })
            .collect();

        debug!(
            month = %month,
            policy = %policy,
            income = %monthly_income,
            unscheduled = %self.unscheduled,
            ending_balance = %running_balance,
            "projected cash flow"
        );
        Ok(projection)
    }

    fn window(&self, month: YearMonth, policy: DistributionPolicy) -> Vec<NaiveDate> {
        let days: Vec<NaiveDate> = month.days().collect();
        let width = (self.window_days as usize).min(days.len());

        match policy {
            DistributionPolicy::Early => days[..width].to_vec(),
            DistributionPolicy::Late => days[days.len() - width..].to_vec(),
            DistributionPolicy::Balanced => days,
        }
    }

    fn synthetic_by_day(
        &self,
        scheduled: &BTreeMap<NaiveDate, Money>,
        month: YearMonth,
        policy: DistributionPolicy,
    ) -> BTreeMap<NaiveDate, Money> {
        if self.unscheduled.is_zero() {
            return BTreeMap::new();
        }

        let window = self.window(month, policy);
        let open: Vec<NaiveDate> = window
            .iter()
            .copied()
            .filter(|d| scheduled.get(d).map_or(true, |m| m.is_zero()))
            .collect();
        let targets = if open.is_empty() { window } else { open };

        targets
            .iter()
            .copied()
            .zip(self.unscheduled.split_even(targets.len()))
            .collect()
    }
}

fn scheduled_by_day(schedule: &[PaymentSchedule], month: YearMonth) -> BillflowResult<BTreeMap<NaiveDate, Money>> {
    let mut by_day = BTreeMap::new();

    for entry in schedule {
        if entry.total_amount.is_negative() {
            return Err(BillflowError::InvalidInput(format!(
                "scheduled total for {} is negative ({})",
                entry.date, entry.total_amount
            )));
        }
        if !month.contains(entry.date) {
            warn!(date = %entry.date, month = %month, "ignoring schedule entry outside projected month");
            continue;
        }
        *by_day.entry(entry.date).or_insert_with(Money::zero) += entry.total_amount;
    }

    Ok(by_day)
}

/// The day with the lowest running balance (earliest on ties)
pub fn lowest_point(projection: &[CashFlowProjection]) -> Option<&CashFlowProjection> {
    projection
        .iter()
        .min_by(|a, b| a.running_balance.cmp(&b.running_balance).then(a.date.cmp(&b.date)))
}

/// Days that end with a negative running balance
pub fn shortfall_days(projection: &[CashFlowProjection]) -> Vec<&CashFlowProjection> {
    projection
        .iter()
        .filter(|p| p.running_balance.is_negative())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bill, Obligation};
    use chrono::Datelike;
    use crate::services::ScheduleBuilder;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dollars(n: i64) -> Money {
        Money::from_cents(n * 100)
    }

    fn march_schedule(policy: DistributionPolicy) -> Vec<PaymentSchedule> {
        let obligations = vec![
            Obligation::Bill(Bill::new("A", "Utilities", dollars(100), date(2024, 3, 10))),
            Obligation::Bill(Bill::new("B", "Utilities", dollars(50), date(2024, 3, 10))),
            Obligation::Bill(Bill::new("C", "Housing", dollars(30), date(2024, 3, 22))),
        ];
        ScheduleBuilder::new().build(&obligations, YearMonth::new(2024, 3).unwrap(), policy)
    }

    fn assert_recurrence(projection: &[CashFlowProjection]) {
        let mut previous = Money::zero();
        for day in projection {
            assert_eq!(
                day.running_balance,
                previous + day.income_for_day - day.expense_for_day
            );
            previous = day.running_balance;
        }
    }

    #[test]
    fn test_leap_february_income_only() {
        let feb = YearMonth::new(2024, 2).unwrap();
        let projection = CashFlowProjector::new()
            .project(&[], feb, dollars(3000), DistributionPolicy::Balanced)
            .unwrap();

        assert_eq!(projection.len(), 29);
        for day in &projection {
            let expected = match day.date.day() {
                1 | 15 => dollars(1500),
                _ => Money::zero(),
            };
            assert_eq!(day.income_for_day, expected, "income on {}", day.date);
            assert!(day.expense_for_day.is_zero());
        }
        assert_eq!(projection[28].running_balance, dollars(3000));
    }

    #[test]
    fn test_one_entry_per_day_for_every_month_length() {
        for (year, month, days) in [(2023, 2, 28), (2024, 2, 29), (2024, 4, 30), (2024, 3, 31)] {
            let m = YearMonth::new(year, month).unwrap();
            let projection = CashFlowProjector::new()
                .project(&[], m, dollars(1000), DistributionPolicy::Late)
                .unwrap();
            assert_eq!(projection.len(), days);
            assert_eq!(projection[0].date, m.first_day());
            assert!(projection.windows(2).all(|w| w[0].date.succ_opt() == Some(w[1].date)));
        }
    }

    #[test]
    fn test_scheduled_expenses_and_recurrence() {
        let march = YearMonth::new(2024, 3).unwrap();
        let projection = CashFlowProjector::new()
            .project(&march_schedule(DistributionPolicy::Balanced), march, dollars(3000), DistributionPolicy::Balanced)
            .unwrap();

        assert_eq!(projection[9].expense_for_day, dollars(150));
        assert_eq!(projection[21].expense_for_day, dollars(30));
        assert_eq!(projection[30].running_balance, dollars(3000 - 180));
        assert_recurrence(&projection);
    }

    #[test]
    fn test_odd_income_cent_goes_to_first_payday() {
        let march = YearMonth::new(2024, 3).unwrap();
        let projection = CashFlowProjector::new()
            .project(&[], march, Money::from_cents(100001), DistributionPolicy::Balanced)
            .unwrap();

        assert_eq!(projection[0].income_for_day.cents(), 50001);
        assert_eq!(projection[14].income_for_day.cents(), 50000);
        assert_eq!(projection[30].running_balance.cents(), 100001);
    }

    #[test]
    fn test_unscheduled_front_loaded_skips_scheduled_days() {
        let march = YearMonth::new(2024, 3).unwrap();
        let schedule = march_schedule(DistributionPolicy::Early);
        let projection = CashFlowProjector::new()
            .with_unscheduled(dollars(90))
            .project(&schedule, march, Money::zero(), DistributionPolicy::Early)
            .unwrap();

        // Day 5 holds the scheduled payments; the other nine window days share the pool
        assert_eq!(projection[4].expense_for_day, dollars(180));
        for i in (0..10).filter(|i| *i != 4) {
            assert_eq!(projection[i].expense_for_day, dollars(10), "day {}", i + 1);
        }
        assert!(projection[10..].iter().all(|d| d.expense_for_day.is_zero()));
        assert_eq!(projection[30].running_balance, -dollars(270));
        assert_recurrence(&projection);
    }

    #[test]
    fn test_unscheduled_back_loaded() {
        let april = YearMonth::new(2024, 4).unwrap();
        let projection = CashFlowProjector::new()
            .with_unscheduled(dollars(100))
            .project(&[], april, Money::zero(), DistributionPolicy::Late)
            .unwrap();

        assert!(projection[..20].iter().all(|d| d.expense_for_day.is_zero()));
        assert!(projection[20..].iter().all(|d| d.expense_for_day == dollars(10)));
    }

    #[test]
    fn test_unscheduled_balanced_spreads_over_open_days() {
        let march = YearMonth::new(2024, 3).unwrap();
        let schedule = march_schedule(DistributionPolicy::Balanced);
        let projection = CashFlowProjector::new()
            .with_unscheduled(Money::from_cents(2900))
            .project(&schedule, march, Money::zero(), DistributionPolicy::Balanced)
            .unwrap();

        // 31 days minus the 10th and 22nd leaves 29 open days at $1 each
        assert_eq!(projection[0].expense_for_day, dollars(1));
        assert_eq!(projection[9].expense_for_day, dollars(150));
        assert_eq!(projection[21].expense_for_day, dollars(30));
        let total: Money = projection.iter().map(|d| d.expense_for_day).sum();
        assert_eq!(total, dollars(180) + dollars(29));
    }

    #[test]
    fn test_fully_scheduled_window_still_conserves_pool() {
        let march = YearMonth::new(2024, 3).unwrap();
        let schedule: Vec<_> = march
            .days()
            .take(2)
            .map(|d| PaymentSchedule {
                date: d,
                total_amount: dollars(5),
                items: Vec::new(),
            })
            .collect();
        let projection = CashFlowProjector::new()
            .with_window_days(2)
            .with_unscheduled(dollars(4))
            .project(&schedule, march, Money::zero(), DistributionPolicy::Early)
            .unwrap();

        assert_eq!(projection[0].expense_for_day, dollars(7));
        assert_eq!(projection[1].expense_for_day, dollars(7));
    }

    #[test]
    fn test_rejects_negative_income() {
        let march = YearMonth::new(2024, 3).unwrap();
        let err = CashFlowProjector::new()
            .project(&[], march, Money::from_cents(-1), DistributionPolicy::Balanced)
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_custom_paydays_clamp() {
        let feb = YearMonth::new(2023, 2).unwrap();
        let projector = CashFlowProjector::new().with_income_model(IncomeModel::new(vec![30, 1]));
        let projection = projector
            .project(&[], feb, dollars(2000), DistributionPolicy::Balanced)
            .unwrap();

        assert_eq!(projection[0].income_for_day, dollars(1000));
        assert_eq!(projection[27].income_for_day, dollars(1000));
    }

    #[test]
    fn test_idempotent() {
        let march = YearMonth::new(2024, 3).unwrap();
        let schedule = march_schedule(DistributionPolicy::Late);
        let projector = CashFlowProjector::new().with_unscheduled(dollars(45));
        assert_eq!(
            projector.project(&schedule, march, dollars(2500), DistributionPolicy::Late).unwrap(),
            projector.project(&schedule, march, dollars(2500), DistributionPolicy::Late).unwrap()
        );
    }

    #[test]
    fn test_lowest_point_and_shortfall() {
        let march = YearMonth::new(2024, 3).unwrap();
        let schedule = vec![PaymentSchedule {
            date: date(2024, 3, 3),
            total_amount: dollars(2000),
            items: Vec::new(),
        }];
        let projection = CashFlowProjector::new()
            .project(&schedule, march, dollars(3000), DistributionPolicy::Balanced)
            .unwrap();

        let low = lowest_point(&projection).unwrap();
        assert_eq!(low.date, date(2024, 3, 3));
        assert_eq!(low.running_balance, -dollars(500));
        assert_eq!(shortfall_days(&projection).len(), 12);
    }
}
