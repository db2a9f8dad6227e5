//! Argument parsing shared by several commands

use chrono::NaiveDate;
use clap::Args;

use crate::config::Settings;
use crate::error::{BillflowError, BillflowResult};
use crate::models::{DistributionPolicy, Money, YearMonth};

/// Month, income and policy selection for the planning commands
#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// Month to plan (YYYY-MM, "current", "next" or "last")
    #[arg(short, long)]
    pub month: Option<String>,

    /// Monthly income (defaults to the configured income)
    #[arg(short, long)]
    pub income: Option<String>,

    /// Distribution policy: early, balanced or late
    #[arg(short, long)]
    pub policy: Option<String>,
}

/// Month, income and policy after applying defaults from settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanRequest {
    pub month: YearMonth,
    pub income: Money,
    pub policy: DistributionPolicy,
}

impl PlanArgs {
    pub fn resolve(&self, settings: &Settings) -> BillflowResult<PlanRequest> {
        self.resolve_at(settings, YearMonth::current())
    }

    fn resolve_at(&self, settings: &Settings, today: YearMonth) -> BillflowResult<PlanRequest> {
        let month = match &self.month {
            Some(m) => YearMonth::parse_relative(m, today)?,
            None => today,
        };
        let income = match &self.income {
            Some(i) => parse_money(i, "income")?,
            None => settings.monthly_income,
        };
        let policy = match &self.policy {
            Some(p) => parse_policy(p)?,
            None => settings.default_policy,
        };

        Ok(PlanRequest {
            month,
            income,
            policy,
        })
    }
}

/// Parse an amount such as "12.99" or "$1200"
pub fn parse_money(value: &str, field: &str) -> BillflowResult<Money> {
    let money = Money::parse(value).map_err(|e| {
        BillflowError::InvalidInput(format!(
            "Invalid {} '{}'. Use a format like '12.99'. Error: {}",
            field, value, e
        ))
    })?;
    if money.is_negative() {
        return Err(BillflowError::InvalidInput(format!(
            "{} cannot be negative ({})",
            field, money
        )));
    }
    Ok(money)
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(value: &str) -> BillflowResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        BillflowError::InvalidPeriod(format!("Invalid date '{}'. Use YYYY-MM-DD", value))
    })
}

pub fn parse_policy(value: &str) -> BillflowResult<DistributionPolicy> {
    DistributionPolicy::parse(value).ok_or_else(|| {
        BillflowError::Validation(format!(
            "Invalid policy '{}'. Valid policies: early, balanced, late",
            value
        ))
    })
}
