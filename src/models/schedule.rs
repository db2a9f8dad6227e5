//! Derived schedule, projection and category-total value types
//!
//! These are recomputed from scratch on every request and never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::ObligationId;
use super::money::Money;
use super::obligation::Obligation;

/// Snapshot of an obligation placed on a schedule date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationRef {
    pub id: ObligationId,
    pub name: String,
    pub category: String,
    pub amount: Money,
    /// The obligation's own due date
    pub due_date: NaiveDate,
    /// The date the payment is scheduled for after policy is applied
    pub effective_date: NaiveDate,
}

impl ObligationRef {
    /// Reference an obligation on its original due date
    pub fn new(obligation: &Obligation) -> Self {
        Self::scheduled_on(obligation, obligation.due_date())
    }

    /// Reference an obligation moved to `effective_date`
    pub fn scheduled_on(obligation: &Obligation, effective_date: NaiveDate) -> Self {
        Self {
            id: obligation.id(),
            name: obligation.name().to_string(),
            category: obligation.category().to_string(),
            amount: obligation.amount(),
            due_date: obligation.due_date(),
            effective_date,
        }
    }

    /// Whether the policy moved this payment off its due date
    pub fn is_moved(&self) -> bool {
        self.due_date != self.effective_date
    }
}

/// All payments falling on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub date: NaiveDate,
    pub total_amount: Money,
    pub items: Vec<ObligationRef>,
}

impl PaymentSchedule {
    /// Create an entry from its items; the total is always derived
    pub fn new(date: NaiveDate, items: Vec<ObligationRef>) -> Self {
        let total_amount = items.iter().map(|i| i.amount).sum();
        Self {
            date,
            total_amount,
            items,
        }
    }

    /// ISO date key ("2024-03-10")
    pub fn key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Sum of every entry's total
pub fn schedule_total(schedule: &[PaymentSchedule]) -> Money {
    schedule.iter().map(|s| s.total_amount).sum()
}

/// One day of a cash-flow projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowProjection {
    pub date: NaiveDate,
    pub income_for_day: Money,
    pub expense_for_day: Money,
    /// Relative to zero at the start of the month, not an account balance
    pub running_balance: Money,
}

impl CashFlowProjection {
    /// Net change for the day
    pub fn net(&self) -> Money {
        self.income_for_day - self.expense_for_day
    }
}

/// Scheduled spend for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bill;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_schedule_total_is_derived() {
        let a = Obligation::Bill(Bill::new("A", "Utilities", Money::from_cents(10000), date(2024, 3, 10)));
        let b = Obligation::Bill(Bill::new("B", "Housing", Money::from_cents(5000), date(2024, 3, 10)));

        let entry = PaymentSchedule::new(date(2024, 3, 10), vec![ObligationRef::new(&a), ObligationRef::new(&b)]);
        assert_eq!(entry.total_amount.cents(), 15000);
        assert_eq!(entry.key(), "2024-03-10");
    }

    #[test]
    fn test_moved_reference() {
        let bill = Obligation::Bill(Bill::new("Rent", "Housing", Money::from_cents(100), date(2024, 3, 20)));
        assert!(!ObligationRef::new(&bill).is_moved());
        assert!(ObligationRef::scheduled_on(&bill, date(2024, 3, 5)).is_moved());
    }

    #[test]
    fn test_projection_net() {
        let day = CashFlowProjection {
            date: date(2024, 3, 1),
            income_for_day: Money::from_cents(150000),
            expense_for_day: Money::from_cents(20000),
            running_balance: Money::from_cents(130000),
        };
        assert_eq!(day.net().cents(), 130000);
    }
}
