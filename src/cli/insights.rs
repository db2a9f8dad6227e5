//! CLI command handler for spending insights

use clap::Args;

use crate::config::Settings;
use crate::error::BillflowResult;
use crate::insights::InsightsReport;
use crate::models::UserId;
use crate::storage::{ObligationStore, Storage};

/// Arguments for `insights`
#[derive(Args, Debug, Clone, Default)]
pub struct InsightsArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the price-alert threshold (percent)
    #[arg(long)]
    pub threshold: Option<f64>,
}

/// Handle the insights command
pub fn handle_insights_command(
    storage: &Storage,
    settings: &Settings,
    user: UserId,
    args: &InsightsArgs,
) -> BillflowResult<()> {
    let obligations = storage.list_obligations(&user)?;

    let mut settings = settings.clone();
    if let Some(threshold) = args.threshold {
        settings.price_alert_threshold_pct = threshold;
    }

    let report = InsightsReport::generate(&obligations, &settings);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.format_terminal());
    }

    Ok(())
}
