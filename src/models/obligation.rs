//! Bill, Subscription and the Obligation union
//!
//! Bills and subscriptions arrive from the data store as two different record
//! shapes. Both are validated into these types at the boundary, so everything
//! downstream can rely on a name, a category, a non-negative amount and a due
//! date being present.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BillId, ObligationId, SubscriptionId};
use super::money::Money;

/// Category assigned to obligations that arrive without one
pub const FALLBACK_CATEGORY: &str = "Other";

/// How often a subscription bills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingCycle {
    /// Parse billing cycle from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            "quarterly" | "quarter" => Some(Self::Quarterly),
            "yearly" | "year" | "annual" | "annually" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Normalize a charge on this cycle to a per-month amount
    pub fn monthly_equivalent(&self, amount: Money) -> Money {
        match self {
            Self::Weekly => amount.scale(52, 12),
            Self::Monthly => amount,
            Self::Quarterly => amount.scale(1, 3),
            Self::Yearly => amount.scale(1, 12),
        }
    }

    /// Number of charges per year
    pub fn charges_per_year(&self) -> i64 {
        match self {
            Self::Weekly => 52,
            Self::Monthly => 12,
            Self::Quarterly => 4,
            Self::Yearly => 1,
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Quarterly => write!(f, "Quarterly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

/// A bill (rent, utilities, insurance, loan payment...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier
    pub id: BillId,

    /// Display name (e.g., "Electric")
    pub name: String,

    /// Expense category
    pub category: String,

    /// Amount due
    pub amount: Money,

    /// Next due date
    pub due_date: NaiveDate,

    /// Whether the bill repeats every month
    #[serde(default = "default_true")]
    pub recurring: bool,

    /// Whether the bill is paid automatically
    #[serde(default)]
    pub autopay: bool,

    /// Free-form notes
    #[serde(default)]
    pub notes: String,

    /// When the bill was created
    pub created_at: DateTime<Utc>,

    /// When the bill was last modified
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Bill {
    /// Create a new recurring bill
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        amount: Money,
        due_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BillId::new(),
            name: name.into(),
            category: category.into(),
            amount,
            due_date,
            recurring: true,
            autopay: false,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a one-off bill
    pub fn one_off(
        name: impl Into<String>,
        category: impl Into<String>,
        amount: Money,
        due_date: NaiveDate,
    ) -> Self {
        let mut bill = Self::new(name, category, amount, due_date);
        bill.recurring = false;
        bill
    }

    /// Validate the bill
    pub fn validate(&self) -> Result<(), ObligationValidationError> {
        validate_common(&self.name, self.amount)
    }
}

/// A subscription (streaming, software, memberships...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier
    pub id: SubscriptionId,

    /// Service name (e.g., "Netflix")
    pub name: String,

    /// Expense category
    pub category: String,

    /// Amount charged each billing cycle
    pub amount: Money,

    /// Date of the next charge
    pub next_billing_date: NaiveDate,

    /// How often the subscription charges
    #[serde(default)]
    pub billing_cycle: BillingCycle,

    /// Amount charged before the most recent price change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_amount: Option<Money>,

    /// Self-reported number of uses per month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_per_month: Option<u32>,

    /// Cancelled subscriptions stay on record but are never scheduled
    #[serde(default = "default_true")]
    pub active: bool,

    /// When the subscription was created
    pub created_at: DateTime<Utc>,

    /// When the subscription was last modified
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Create a new monthly subscription
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        amount: Money,
        next_billing_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SubscriptionId::new(),
            name: name.into(),
            category: category.into(),
            amount,
            next_billing_date,
            billing_cycle: BillingCycle::Monthly,
            previous_amount: None,
            usage_per_month: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Charge normalized to a per-month amount
    pub fn monthly_cost(&self) -> Money {
        self.billing_cycle.monthly_equivalent(self.amount)
    }

    /// Mark the subscription as cancelled
    pub fn cancel(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Record a new price, remembering the old one
    pub fn change_price(&mut self, amount: Money) {
        if amount != self.amount {
            self.previous_amount = Some(self.amount);
            self.amount = amount;
            self.updated_at = Utc::now();
        }
    }

    /// Validate the subscription
    pub fn validate(&self) -> Result<(), ObligationValidationError> {
        validate_common(&self.name, self.amount)?;
        if let Some(previous) = self.previous_amount {
            if previous.is_negative() {
                return Err(ObligationValidationError::NegativeAmount(previous));
            }
        }
        Ok(())
    }
}

fn validate_common(name: &str, amount: Money) -> Result<(), ObligationValidationError> {
    if name.trim().is_empty() {
        return Err(ObligationValidationError::EmptyName);
    }

    if name.len() > 100 {
        return Err(ObligationValidationError::NameTooLong(name.len()));
    }

    if amount.is_negative() {
        return Err(ObligationValidationError::NegativeAmount(amount));
    }

    if amount > Money::MAX_INPUT {
        return Err(ObligationValidationError::AmountTooLarge(amount));
    }

    Ok(())
}

/// A recurring or one-off financial obligation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Obligation {
    Bill(Bill),
    Subscription(Subscription),
}

impl Obligation {
    pub fn id(&self) -> ObligationId {
        match self {
            Self::Bill(b) => ObligationId::Bill(b.id),
            Self::Subscription(s) => ObligationId::Subscription(s.id),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Bill(b) => &b.name,
            Self::Subscription(s) => &s.name,
        }
    }

    /// Category name; blank categories report as "Other"
    pub fn category(&self) -> &str {
        let category = match self {
            Self::Bill(b) => b.category.trim(),
            Self::Subscription(s) => s.category.trim(),
        };
        if category.is_empty() {
            FALLBACK_CATEGORY
        } else {
            category
        }
    }

    pub fn amount(&self) -> Money {
        match self {
            Self::Bill(b) => b.amount,
            Self::Subscription(s) => s.amount,
        }
    }

    pub fn due_date(&self) -> NaiveDate {
        match self {
            Self::Bill(b) => b.due_date,
            Self::Subscription(s) => s.next_billing_date,
        }
    }

    /// Subscriptions always recur
    pub fn recurring(&self) -> bool {
        match self {
            Self::Bill(b) => b.recurring,
            Self::Subscription(_) => true,
        }
    }

    /// Whether the obligation should be scheduled at all
    pub fn is_active(&self) -> bool {
        match self {
            Self::Bill(_) => true,
            Self::Subscription(s) => s.active,
        }
    }

    /// Per-month cost (bills are treated as monthly)
    pub fn monthly_cost(&self) -> Money {
        match self {
            Self::Bill(b) => b.amount,
            Self::Subscription(s) => s.monthly_cost(),
        }
    }

    /// "Bill" or "Subscription"
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Bill(_) => "Bill",
            Self::Subscription(_) => "Subscription",
        }
    }
}

impl From<Bill> for Obligation {
    fn from(bill: Bill) -> Self {
        Self::Bill(bill)
    }
}

impl From<Subscription> for Obligation {
    fn from(subscription: Subscription) -> Self {
        Self::Subscription(subscription)
    }
}

impl fmt::Display for Obligation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name(), self.amount(), self.due_date())
    }
}

/// Validation errors for bills and subscriptions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObligationValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeAmount(Money),
    AmountTooLarge(Money),
}

impl fmt::Display for ObligationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Name too long ({} chars, max 100)", len),
            Self::NegativeAmount(amount) => {
                write!(f, "Amount cannot be negative ({})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount {} exceeds the maximum of {}", amount, Money::MAX_INPUT)
            }
        }
    }
}

impl std::error::Error for ObligationValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_bill() {
        let bill = Bill::new("Electric", "Utilities", Money::from_cents(8500), date(2024, 3, 12));
        assert!(bill.recurring);
        assert!(!bill.autopay);
        assert!(bill.validate().is_ok());

        let once = Bill::one_off("Car repair", "Transportation", Money::from_cents(40000), date(2024, 3, 2));
        assert!(!once.recurring);
    }

    #[test]
    fn test_validation() {
        let mut bill = Bill::new("Rent", "Housing", Money::from_cents(150000), date(2024, 3, 1));
        bill.name = "   ".into();
        assert_eq!(bill.validate(), Err(ObligationValidationError::EmptyName));

        bill.name = "Rent".into();
        bill.amount = Money::from_cents(-1);
        assert!(matches!(
            bill.validate(),
            Err(ObligationValidationError::NegativeAmount(_))
        ));

        bill.amount = Money::MAX_INPUT;
        assert!(bill.validate().is_ok());
        bill.amount = Money::from_cents(Money::MAX_INPUT.cents() + 1);
        assert!(matches!(
            bill.validate(),
            Err(ObligationValidationError::AmountTooLarge(_))
        ));
    }

    #[test]
    fn test_billing_cycle_monthly_equivalent() {
        let amount = Money::from_cents(12000);
        assert_eq!(BillingCycle::Monthly.monthly_equivalent(amount).cents(), 12000);
        assert_eq!(BillingCycle::Yearly.monthly_equivalent(amount).cents(), 1000);
        assert_eq!(BillingCycle::Quarterly.monthly_equivalent(amount).cents(), 4000);
        assert_eq!(
            BillingCycle::Weekly.monthly_equivalent(Money::from_cents(1200)).cents(),
            5200
        );
    }

    #[test]
    fn test_change_price_keeps_previous() {
        let mut sub = Subscription::new("Netflix", "Streaming", Money::from_cents(1549), date(2024, 3, 8));
        sub.change_price(Money::from_cents(1799));
        assert_eq!(sub.previous_amount, Some(Money::from_cents(1549)));
        assert_eq!(sub.amount.cents(), 1799);

        sub.change_price(Money::from_cents(1799));
        assert_eq!(sub.previous_amount, Some(Money::from_cents(1549)));
    }

    #[test]
    fn test_obligation_accessors() {
        let sub = Subscription::new("Spotify", "", Money::from_cents(1099), date(2024, 3, 20));
        let obligation = Obligation::from(sub.clone());
        assert_eq!(obligation.name(), "Spotify");
        assert_eq!(obligation.category(), FALLBACK_CATEGORY);
        assert_eq!(obligation.due_date(), date(2024, 3, 20));
        assert!(obligation.recurring());
        assert_eq!(obligation.id(), ObligationId::Subscription(sub.id));
    }

    #[test]
    fn test_obligation_serialization() {
        let bill = Bill::new("Water", "Utilities", Money::from_cents(4200), date(2024, 3, 15));
        let obligation = Obligation::Bill(bill);
        let json = serde_json::to_string(&obligation).unwrap();
        assert!(json.contains("\"kind\":\"bill\""));
        let back: Obligation = serde_json::from_str(&json).unwrap();
        assert_eq!(obligation, back);
    }
}
