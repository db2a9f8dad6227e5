//! Calendar month representation
//!
//! A `YearMonth` is always a valid, fully representable month: both its first
//! and last day exist as `NaiveDate`s. Everything that iterates "every day of
//! the month" goes through it.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BillflowError, BillflowResult};

/// A calendar month (e.g., "2024-03")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    first: NaiveDate,
    last: NaiveDate,
}

impl YearMonth {
    /// Create a month, rejecting out-of-range components
    pub fn new(year: i32, month: u32) -> BillflowResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(BillflowError::InvalidPeriod(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }

        let days = days_in_month(year, month);
        let first = NaiveDate::from_ymd_opt(year, month, 1);
        let last = NaiveDate::from_ymd_opt(year, month, days);

        match (first, last) {
            (Some(first), Some(last)) => Ok(Self { first, last }),
            _ => Err(BillflowError::InvalidPeriod(format!(
                "{:04}-{:02} is outside the supported date range",
                year, month
            ))),
        }
    }

    /// The month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let last = first
            .with_day(days_in_month(date.year(), date.month()))
            .unwrap_or(date);
        Self { first, last }
    }

    /// The current month in local time
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Last day of the month (inclusive)
    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    /// Number of calendar days (28-31)
    pub fn days_in_month(&self) -> u32 {
        self.last.day()
    }

    /// Day `n` of the month, clamped into `1..=days_in_month`
    ///
    /// Day 31 of February is February's last day, never a day in March.
    pub fn day(&self, n: u32) -> NaiveDate {
        let n = n.clamp(1, self.days_in_month());
        self.first.with_day(n).unwrap_or(self.last)
    }

    /// Every day of the month in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.first.iter_days().take(self.days_in_month() as usize)
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first && date <= self.last
    }

    /// The following month
    pub fn next(&self) -> BillflowResult<Self> {
        if self.month() == 12 {
            Self::new(self.year() + 1, 1)
        } else {
            Self::new(self.year(), self.month() + 1)
        }
    }

    /// The preceding month
    pub fn prev(&self) -> BillflowResult<Self> {
        if self.month() == 1 {
            Self::new(self.year() - 1, 12)
        } else {
            Self::new(self.year(), self.month() - 1)
        }
    }

    /// Parse a "YYYY-MM" string
    pub fn parse(s: &str) -> BillflowResult<Self> {
        let s = s.trim();
        let invalid = || {
            BillflowError::InvalidPeriod(format!("expected YYYY-MM (e.g. 2024-03), got '{}'", s))
        };

        let (year, month) = s.rsplit_once('-').ok_or_else(invalid)?;
        if year.is_empty() || month.is_empty() {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month)
    }

    /// Parse a month, also accepting "current", "next" and "last"
    /// relative to `reference`
    pub fn parse_relative(s: &str, reference: YearMonth) -> BillflowResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "current" | "now" | "this" => Ok(reference),
            "next" => reference.next(),
            "last" | "prev" | "previous" => reference.prev(),
            _ => Self::parse(s),
        }
    }
}

impl Default for YearMonth {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl TryFrom<String> for YearMonth {
    type Error = BillflowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let march = YearMonth::new(2024, 3).unwrap();
        assert_eq!(march.first_day(), date(2024, 3, 1));
        assert_eq!(march.last_day(), date(2024, 3, 31));
        assert_eq!(march.days_in_month(), 31);
    }

    #[test]
    fn test_days_in_month_lengths() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(1900, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2000, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2024, 4).unwrap().days_in_month(), 30);
    }

    #[test]
    fn test_invalid_components() {
        assert!(matches!(
            YearMonth::new(2024, 13),
            Err(BillflowError::InvalidPeriod(_))
        ));
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(i32::MAX, 1).is_err());
    }

    #[test]
    fn test_day_clamps_to_month_end() {
        let feb = YearMonth::new(2023, 2).unwrap();
        assert_eq!(feb.day(31), date(2023, 2, 28));
        assert_eq!(feb.day(0), date(2023, 2, 1));
        assert_eq!(feb.day(5), date(2023, 2, 5));
    }

    #[test]
    fn test_days_iterator() {
        let feb = YearMonth::new(2024, 2).unwrap();
        let days: Vec<_> = feb.days().collect();
        assert_eq!(days.len(), 29);
        assert_eq!(days[0], date(2024, 2, 1));
        assert_eq!(days[28], date(2024, 2, 29));
    }

    #[test]
    fn test_contains() {
        let jan = YearMonth::new(2025, 1).unwrap();
        assert!(jan.contains(date(2025, 1, 15)));
        assert!(jan.contains(date(2025, 1, 31)));
        assert!(!jan.contains(date(2025, 2, 1)));
        assert!(!jan.contains(date(2024, 12, 31)));
    }

    #[test]
    fn test_navigation() {
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next().unwrap(), YearMonth::new(2025, 1).unwrap());
        let jan = YearMonth::new(2025, 1).unwrap();
        assert_eq!(jan.prev().unwrap(), dec);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            YearMonth::parse("2024-03").unwrap(),
            YearMonth::new(2024, 3).unwrap()
        );
        assert!(YearMonth::parse("2024-13").is_err());
        assert!(YearMonth::parse("March").is_err());
        assert!(YearMonth::parse("2024-").is_err());
    }

    #[test]
    fn test_parse_relative() {
        let reference = YearMonth::new(2024, 1).unwrap();
        assert_eq!(
            YearMonth::parse_relative("last", reference).unwrap(),
            YearMonth::new(2023, 12).unwrap()
        );
        assert_eq!(
            YearMonth::parse_relative("next", reference).unwrap(),
            YearMonth::new(2024, 2).unwrap()
        );
        assert_eq!(
            YearMonth::parse_relative("2024-06", reference).unwrap(),
            YearMonth::new(2024, 6).unwrap()
        );
    }

    #[test]
    fn test_of_date() {
        assert_eq!(
            YearMonth::of(date(2024, 2, 17)),
            YearMonth::new(2024, 2).unwrap()
        );
    }

    #[test]
    fn test_serialization() {
        let month = YearMonth::new(2024, 3).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2024-03\"");
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(month, back);
        assert!(serde_json::from_str::<YearMonth>("\"2024-00\"").is_err());
    }
}
