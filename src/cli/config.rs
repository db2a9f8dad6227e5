//! Settings CLI commands

use clap::Subcommand;

use crate::config::{BillflowPaths, Settings};
use crate::error::BillflowResult;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current settings
    Show,
    /// Change a setting
    ///
    /// Keys: income, policy, early-day, late-day, window-days, paydays,
    /// price-alert, currency, user
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
    /// Print the settings file location
    Path,
}

/// Handle a config command
pub fn handle_config_command(
    paths: &BillflowPaths,
    settings: &mut Settings,
    cmd: ConfigCommands,
) -> BillflowResult<()> {
    match cmd {
        ConfigCommands::Show => print!("{}", format_settings(settings)),

        ConfigCommands::Set { key, value } => {
            settings.set(&key, &value)?;
            settings.save(paths)?;
            println!("Set {} = {}", key, value);
        }

        ConfigCommands::Path => println!("{}", paths.settings_file().display()),
    }

    Ok(())
}

fn format_settings(settings: &Settings) -> String {
    let paydays: Vec<String> = settings.paydays.iter().map(u32::to_string).collect();
    let user = settings
        .default_user
        .map(|u| u.to_string())
        .unwrap_or_else(|| "(none)".to_string());

    let mut output = String::new();
    output.push_str(&format!("{:<16} {}\n", "income", settings.monthly_income));
    output.push_str(&format!("{:<16} {}\n", "policy", settings.default_policy));
    output.push_str(&format!("{:<16} {}\n", "early-day", settings.early_day));
    output.push_str(&format!("{:<16} {}\n", "late-day", settings.late_day));
    output.push_str(&format!("{:<16} {}\n", "window-days", settings.window_days));
    output.push_str(&format!("{:<16} {}\n", "paydays", paydays.join(",")));
    output.push_str(&format!("{:<16} {}%\n", "price-alert", settings.price_alert_threshold_pct));
    output.push_str(&format!("{:<16} {}\n", "currency", settings.currency_symbol));
    output.push_str(&format!("{:<16} {}\n", "user", user));
    output.push_str(&format!("{:<16} {}\n", "categories", settings.categories.len()));
    output
}
