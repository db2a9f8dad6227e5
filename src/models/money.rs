//! Money type for bill and subscription amounts
//!
//! Amounts are whole cents in an `i64`. Schedules, projections and category
//! totals are all sums of these, so every total is exact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::error::{BillflowError, BillflowResult};

/// An amount of money in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest amount accepted from input: $10 billion
    ///
    /// Sums of any realistic number of obligations stay far inside `i64`.
    pub const MAX_INPUT: Money = Money(1_000_000_000_000);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use billflow::models::Money;
    /// let rent = Money::from_cents(120000); // $1200.00
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse an amount typed by a user
    ///
    /// Accepts "12.99", "$1,200", "-5.5" and ".75". A bare integer is whole
    /// currency units, so "12" is $12.00. More than two decimals is an error
    /// rather than a silent rounding.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let digits: String = rest.chars().filter(|c| *c != ',').collect();

        if digits.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (whole, fraction) = digits.split_once('.').unwrap_or((&digits, ""));
        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !is_digits(whole) || !is_digits(fraction) || (whole.is_empty() && fraction.is_empty()) {
            return Err(MoneyParseError::InvalidFormat(s.trim().to_string()));
        }
        if fraction.len() > 2 {
            return Err(MoneyParseError::TooPrecise(s.trim().to_string()));
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            // all digits, so a failed parse is an i64 overflow
            whole
                .parse()
                .map_err(|_| MoneyParseError::OutOfRange(s.trim().to_string()))?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().unwrap_or(0) * 10,
            _ => fraction.parse().unwrap_or(0),
        };

        let total = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .filter(|c| *c <= Self::MAX_INPUT.0)
            .ok_or_else(|| MoneyParseError::OutOfRange(s.trim().to_string()))?;

        Ok(Self(if negative { -total } else { total }))
    }

    /// Convert a decimal currency amount (e.g. a row value of `12.99`) to cents
    ///
    /// Rejects NaN and infinities instead of letting them leak into sums.
    pub fn from_decimal_f64(value: f64) -> BillflowResult<Self> {
        if !value.is_finite() {
            return Err(BillflowError::InvalidInput(format!(
                "amount must be a finite number, got {}",
                value
            )));
        }

        let cents = (value * 100.0).round();
        if cents.abs() > Self::MAX_INPUT.0 as f64 {
            return Err(BillflowError::InvalidInput(format!(
                "amount out of range: {} (max {})",
                value,
                Self::MAX_INPUT
            )));
        }

        Ok(Self(cents as i64))
    }

    /// The amount as a decimal number of currency units
    pub fn as_decimal_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Split into `parts` amounts that add back up to exactly `self`
    ///
    /// Remainder cents go to the leading parts.
    pub fn split_even(&self, parts: usize) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }

        let n = parts as i64;
        let base = self.0.div_euclid(n);
        let remainder = self.0.rem_euclid(n) as usize;

        (0..parts)
            .map(|i| Self(if i < remainder { base + 1 } else { base }))
            .collect()
    }

    /// Scale by a percentage, rounding half away from zero to the nearest cent
    pub fn percent(&self, pct: f64) -> Self {
        Self((self.0 as f64 * pct / 100.0).round() as i64)
    }

    /// Multiply by `numerator / denominator`, rounding to the nearest cent
    pub fn scale(&self, numerator: i64, denominator: i64) -> Self {
        if denominator == 0 {
            return Self::zero();
        }
        let scaled = self.0 as i128 * numerator as i128;
        let d = denominator as i128;
        let rounded = if scaled >= 0 {
            (scaled + d / 2) / d
        } else {
            (scaled - d / 2) / d
        };
        Self(rounded as i64)
    }

    /// Format with a currency symbol, sign first: "-€4.50"
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Why a typed amount was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    Empty,
    InvalidFormat(String),
    TooPrecise(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::Empty => write!(f, "Amount is empty"),
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::TooPrecise(s) => {
                write!(f, "Amount has more than two decimal places: {}", s)
            }
            MoneyParseError::OutOfRange(s) => {
                write!(f, "Amount is larger than {}: {}", Money::MAX_INPUT, s)
            }
        }
    }
}

impl std::error::Error for MoneyParseError {}
