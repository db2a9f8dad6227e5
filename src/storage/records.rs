//! Loose row shapes accepted at the data-store boundary
//!
//! Rows exported from the hosted database have optional fields, camelCase
//! or snake_case keys, and amounts that are sometimes strings. They are
//! converted into validated `Bill` / `Subscription` values here so nothing
//! downstream deals with missing or malformed fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BillflowError, BillflowResult};
use crate::models::{Bill, BillId, BillingCycle, Money, Subscription, SubscriptionId, FALLBACK_CATEGORY};

/// An amount as it appears in a row: a number or a string such as "$12.99"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    /// Convert to a non-negative `Money`
    pub fn to_money(&self, field: &str) -> BillflowResult<Money> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => {
                let cleaned: String = s
                    .trim()
                    .trim_start_matches('$')
                    .chars()
                    .filter(|c| *c != ',')
                    .collect();
                cleaned.parse::<f64>().map_err(|_| {
                    BillflowError::InvalidInput(format!("{} is not a number: '{}'", field, s))
                })?
            }
        };

        let money = Money::from_decimal_f64(value)
            .map_err(|e| BillflowError::InvalidInput(format!("{}: {}", field, e)))?;
        if money.is_negative() {
            return Err(BillflowError::InvalidInput(format!(
                "{} cannot be negative ({})",
                field, money
            )));
        }
        Ok(money)
    }
}

/// A bill row with every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub amount: Option<RawAmount>,
    #[serde(alias = "dueDate", alias = "due")]
    pub due_date: Option<String>,
    #[serde(alias = "isRecurring", alias = "is_recurring")]
    pub recurring: Option<bool>,
    #[serde(alias = "autoPay")]
    pub autopay: Option<bool>,
    pub notes: Option<String>,
}

/// A subscription row with every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "cost", alias = "price")]
    pub amount: Option<RawAmount>,
    #[serde(alias = "nextBillingDate", alias = "due_date", alias = "dueDate")]
    pub next_billing_date: Option<String>,
    #[serde(alias = "billingCycle", alias = "frequency")]
    pub billing_cycle: Option<String>,
    #[serde(alias = "previousAmount", alias = "previous_cost")]
    pub previous_amount: Option<RawAmount>,
    #[serde(alias = "usagePerMonth", alias = "usage")]
    pub usage_per_month: Option<u32>,
    #[serde(alias = "isActive", alias = "is_active")]
    pub active: Option<bool>,
}

impl TryFrom<BillRecord> for Bill {
    type Error = BillflowError;

    fn try_from(record: BillRecord) -> Result<Self, Self::Error> {
        let name = required_name(record.name)?;
        let amount = record
            .amount
            .ok_or_else(|| BillflowError::InvalidInput(format!("amount is missing for '{}'", name)))?
            .to_money("amount")?;
        let due_date = parse_date(record.due_date.as_deref(), "due_date", &name)?;

        let mut bill = Bill::new(name, category_or_fallback(record.category), amount, due_date);
        if let Some(id) = record.id.as_deref().and_then(|s| s.parse::<BillId>().ok()) {
            bill.id = id;
        }
        bill.recurring = record.recurring.unwrap_or(true);
        bill.autopay = record.autopay.unwrap_or(false);
        bill.notes = record.notes.unwrap_or_default();

        bill.validate()
            .map_err(|e| BillflowError::Validation(e.to_string()))?;
        Ok(bill)
    }
}

impl TryFrom<SubscriptionRecord> for Subscription {
    type Error = BillflowError;

    fn try_from(record: SubscriptionRecord) -> Result<Self, Self::Error> {
        let name = required_name(record.name)?;
        let amount = record
            .amount
            .ok_or_else(|| BillflowError::InvalidInput(format!("amount is missing for '{}'", name)))?
            .to_money("amount")?;
        let next_billing_date =
            parse_date(record.next_billing_date.as_deref(), "next_billing_date", &name)?;

        let mut sub = Subscription::new(
            name,
            category_or_fallback(record.category),
            amount,
            next_billing_date,
        );
        if let Some(id) = record.id.as_deref().and_then(|s| s.parse::<SubscriptionId>().ok()) {
            sub.id = id;
        }
        if let Some(cycle) = record.billing_cycle {
            sub.billing_cycle = BillingCycle::parse(&cycle).ok_or_else(|| {
                BillflowError::Validation(format!("Unknown billing cycle '{}'", cycle))
            })?;
        }
        sub.previous_amount = record
            .previous_amount
            .map(|a| a.to_money("previous_amount"))
            .transpose()?;
        sub.usage_per_month = record.usage_per_month;
        sub.active = record.active.unwrap_or(true);

        sub.validate()
            .map_err(|e| BillflowError::Validation(e.to_string()))?;
        Ok(sub)
    }
}

fn required_name(name: Option<String>) -> BillflowResult<String> {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| BillflowError::Validation("name is required".into()))
}

fn category_or_fallback(category: Option<String>) -> String {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
}

/// Accepts "YYYY-MM-DD" or a full RFC 3339 timestamp
fn parse_date(value: Option<&str>, field: &str, name: &str) -> BillflowResult<NaiveDate> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BillflowError::Validation(format!("{} is missing for '{}'", field, name)))?;

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc).date_naive());
    }

    Err(BillflowError::InvalidPeriod(format!(
        "{} for '{}' is not a valid date: '{}'",
        field, name, value
    )))
}
