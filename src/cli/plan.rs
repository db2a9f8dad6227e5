//! Planning CLI commands
//!
//! `schedule`, `project`, `categories` and `plan` all build the same monthly
//! plan and differ only in what they print or write.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Settings;
use crate::display::{format_category_totals, format_plan_summary, format_projection, format_schedule};
use crate::error::{BillflowError, BillflowResult};
use crate::export::{export_plan_json, export_plan_yaml, export_projection_csv};
use crate::models::UserId;
use crate::services::{MonthlyPlan, PlannerService};
use crate::storage::Storage;

use super::args::PlanArgs;

/// Arguments for `project`
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Write the projection as CSV to this file instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `plan`
#[derive(Args, Debug, Clone)]
pub struct PlanCommandArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Output format: text, json or yaml
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Compact JSON (no indentation)
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanFormat {
    Text,
    Json,
    Yaml,
}

impl PlanFormat {
    fn parse(s: &str) -> BillflowResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(BillflowError::Validation(format!(
                "Invalid format '{}'. Valid formats: text, json, yaml",
                other
            ))),
        }
    }
}

fn build_plan(storage: &Storage, settings: &Settings, user: UserId, args: &PlanArgs) -> BillflowResult<MonthlyPlan> {
    let request = args.resolve(settings)?;
    PlannerService::new(storage, settings).plan_for_user(&user, request.month, request.income, request.policy)
}

fn create_output(path: &Path) -> BillflowResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        BillflowError::Export(format!("Failed to create output file '{}': {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle the `schedule` command
pub fn handle_schedule_command(
    storage: &Storage,
    settings: &Settings,
    user: UserId,
    args: &PlanArgs,
) -> BillflowResult<()> {
    let plan = build_plan(storage, settings, user, args)?;

    println!("Payment schedule for {} ({} policy)", plan.month, plan.policy);
    println!();
    println!("{}", format_schedule(&plan.schedule));

    if !plan.unscheduled.is_empty() {
        println!();
        println!("Not due this month (spread as {} over the month):", plan.unscheduled_total);
        for item in &plan.unscheduled {
            println!("  {:<28} {:>10}  next due {}", item.name, item.amount.to_string(), item.due_date);
        }
    }

    Ok(())
}

/// Handle the `project` command
pub fn handle_project_command(
    storage: &Storage,
    settings: &Settings,
    user: UserId,
    args: &ProjectArgs,
) -> BillflowResult<()> {
    let plan = build_plan(storage, settings, user, &args.plan)?;

    if let Some(path) = &args.output {
        let writer = create_output(path)?;
        export_projection_csv(&plan.projection, writer)?;
        println!("Projection for {} written to: {}", plan.month, path.display());
        return Ok(());
    }

    println!(
        "Cash flow for {} ({} policy, income {})",
        plan.month, plan.policy, plan.monthly_income
    );
    println!();
    print!("{}", format_projection(&plan.projection));

    let short = plan.shortfall_day_count();
    if short > 0 {
        println!();
        println!(
            "Lowest balance {} on {}; negative on {} day(s).",
            plan.lowest_balance, plan.lowest_balance_date, short
        );
    }

    Ok(())
}

/// Handle the `categories` command
pub fn handle_categories_command(
    storage: &Storage,
    settings: &Settings,
    user: UserId,
    args: &PlanArgs,
) -> BillflowResult<()> {
    let plan = build_plan(storage, settings, user, args)?;

    println!("Spending by category for {}", plan.month);
    println!();
    println!("{}", format_category_totals(&plan.category_totals));
    Ok(())
}

/// Handle the `plan` command
pub fn handle_plan_command(
    storage: &Storage,
    settings: &Settings,
    user: UserId,
    args: &PlanCommandArgs,
) -> BillflowResult<()> {
    let format = PlanFormat::parse(&args.format)?;
    let plan = build_plan(storage, settings, user, &args.plan)?;

    match &args.output {
        Some(path) => {
            let mut writer = create_output(path)?;
            write_plan(&plan, format, !args.compact, &mut writer)?;
            writer.flush()?;
            println!("Plan for {} written to: {}", plan.month, path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_plan(&plan, format, !args.compact, &mut handle)?;
            if format == PlanFormat::Json {
                writeln!(handle)?;
            }
        }
    }

    Ok(())
}

fn write_plan<W: Write>(plan: &MonthlyPlan, format: PlanFormat, pretty: bool, writer: &mut W) -> BillflowResult<()> {
    match format {
        PlanFormat::Text => {
            writer.write_all(format_plan_summary(plan).as_bytes())?;
            Ok(())
        }
        PlanFormat::Json => export_plan_json(plan, writer, pretty),
        PlanFormat::Yaml => export_plan_yaml(plan, writer),
    }
}
