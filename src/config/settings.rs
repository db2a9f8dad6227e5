//! User settings for billflow
//!
//! Manages scheduling preferences (income, policy, anchor days), the category
//! reference table, and display preferences.

use serde::{Deserialize, Serialize};

use super::paths::BillflowPaths;
use crate::error::{BillflowError, BillflowResult};
use crate::models::{default_categories, Category, DistributionPolicy, Money, UserId};
use crate::storage::file_io::{read_json_required, write_json_atomic};

/// User settings for billflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// User whose data the CLI reads when no session override is present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<UserId>,

    /// Expected take-home income per month
    #[serde(default)]
    pub monthly_income: Money,

    /// Policy used when none is given on the command line
    #[serde(default)]
    pub default_policy: DistributionPolicy,

    /// Day of month that the "early" policy moves payments to
    #[serde(default = "default_early_day")]
    pub early_day: u32,

    /// Day of month that the "late" policy moves payments to
    #[serde(default = "default_late_day")]
    pub late_day: u32,

    /// Width in days of the early/late synthetic spending window
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Days of the month income arrives on
    #[serde(default = "default_paydays")]
    pub paydays: Vec<u32>,

    /// Minimum price increase (percent) that raises an alert
    #[serde(default = "default_price_alert_threshold")]
    pub price_alert_threshold_pct: f64,

    /// Category reference table
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_early_day() -> u32 {
    5
}

fn default_late_day() -> u32 {
    25
}

fn default_window_days() -> u32 {
    10
}

fn default_paydays() -> Vec<u32> {
    vec![1, 15]
}

fn default_price_alert_threshold() -> f64 {
    5.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_user: None,
            monthly_income: Money::zero(),
            default_policy: DistributionPolicy::default(),
            early_day: default_early_day(),
            late_day: default_late_day(),
            window_days: default_window_days(),
            paydays: default_paydays(),
            price_alert_threshold_pct: default_price_alert_threshold(),
            categories: default_categories(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BillflowPaths) -> BillflowResult<Self> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let settings: Settings = read_json_required(&settings_path).map_err(|e| {
                BillflowError::Config(format!("Failed to load settings file: {}", e))
            })?;
            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BillflowPaths) -> BillflowResult<()> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Check that every scheduling parameter is usable
    pub fn validate(&self) -> BillflowResult<()> {
        for (name, day) in [("early_day", self.early_day), ("late_day", self.late_day)] {
            if !(1..=31).contains(&day) {
                return Err(BillflowError::Config(format!(
                    "{} must be between 1 and 31, got {}",
                    name, day
                )));
            }
        }

        if !(1..=31).contains(&self.window_days) {
            return Err(BillflowError::Config(format!(
                "window_days must be between 1 and 31, got {}",
                self.window_days
            )));
        }

        if self.paydays.is_empty() {
            return Err(BillflowError::Config("paydays cannot be empty".into()));
        }
        if let Some(day) = self.paydays.iter().find(|d| !(1..=31).contains(*d)) {
            return Err(BillflowError::Config(format!(
                "payday must be between 1 and 31, got {}",
                day
            )));
        }

        if self.monthly_income.is_negative() {
            return Err(BillflowError::Config(format!(
                "monthly_income cannot be negative ({})",
                self.monthly_income
            )));
        }

        if !self.price_alert_threshold_pct.is_finite() || self.price_alert_threshold_pct < 0.0 {
            return Err(BillflowError::Config(format!(
                "price_alert_threshold_pct must be a non-negative number, got {}",
                self.price_alert_threshold_pct
            )));
        }

        for category in &self.categories {
            category
                .validate()
                .map_err(|e| BillflowError::Config(e.to_string()))?;
        }

        Ok(())
    }

    /// Update a single setting from its textual form
    ///
    /// Keys: `income`, `policy`, `early-day`, `late-day`, `window-days`,
    /// `paydays` (comma separated), `price-alert`, `currency`, `user`.
    pub fn set(&mut self, key: &str, value: &str) -> BillflowResult<()> {
        let value = value.trim();
        let mut updated = self.clone();

        match key.trim().to_lowercase().replace('_', "-").as_str() {
            "income" | "monthly-income" => {
                updated.monthly_income = Money::parse(value)
                    .map_err(|e| BillflowError::InvalidInput(e.to_string()))?;
            }
            "policy" | "default-policy" => {
                updated.default_policy = DistributionPolicy::parse(value).ok_or_else(|| {
                    BillflowError::Validation(format!(
                        "Invalid policy '{}'. Valid policies: early, balanced, late",
                        value
                    ))
                })?;
            }
            "early-day" => updated.early_day = parse_day(key, value)?,
            "late-day" => updated.late_day = parse_day(key, value)?,
            "window-days" => updated.window_days = parse_day(key, value)?,
            "paydays" => {
                updated.paydays = value
                    .split(',')
                    .map(|d| parse_day(key, d))
                    .collect::<BillflowResult<Vec<_>>>()?;
            }
            "price-alert" | "price-alert-threshold" => {
                updated.price_alert_threshold_pct = value.parse().map_err(|_| {
                    BillflowError::InvalidInput(format!("Invalid percentage: {}", value))
                })?;
            }
            "currency" | "currency-symbol" => updated.currency_symbol = value.to_string(),
            "user" | "default-user" => {
                updated.default_user = Some(value.parse().map_err(|_| {
                    BillflowError::Validation(format!("Invalid user id: {}", value))
                })?);
            }
            other => {
                return Err(BillflowError::Config(format!("Unknown setting: {}", other)));
            }
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn parse_day(key: &str, value: &str) -> BillflowResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| BillflowError::InvalidInput(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_policy, DistributionPolicy::Balanced);
        assert_eq!(settings.early_day, 5);
        assert_eq!(settings.late_day, 25);
        assert_eq!(settings.window_days, 10);
        assert_eq!(settings.paydays, vec![1, 15]);
        assert_eq!(settings.categories.len(), 12);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillflowPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.default_policy = DistributionPolicy::Late;
        settings.monthly_income = Money::from_cents(300000);

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_policy, DistributionPolicy::Late);
        assert_eq!(loaded.monthly_income.cents(), 300000);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"monthly_income": 250000}"#).unwrap();
        assert_eq!(settings.monthly_income.cents(), 250000);
        assert_eq!(settings.paydays, vec![1, 15]);
        assert_eq!(settings.currency_symbol, "$");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillflowPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"early_day": 40}"#).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, BillflowError::Config(_)));
    }

    #[test]
    fn test_set_values() {
        let mut settings = Settings::default();
        settings.set("income", "3000").unwrap();
        settings.set("policy", "early").unwrap();
        settings.set("paydays", "1,15,28").unwrap();

        assert_eq!(settings.monthly_income.cents(), 300000);
        assert_eq!(settings.default_policy, DistributionPolicy::Early);
        assert_eq!(settings.paydays, vec![1, 15, 28]);
    }

    #[test]
    fn test_set_rejects_bad_values_without_changing() {
        let mut settings = Settings::default();
        assert!(settings.set("late-day", "32").is_err());
        assert!(settings.set("income", "-50").is_err());
        assert!(settings.set("colour", "blue").is_err());
        assert_eq!(settings, Settings::default());
    }
}
