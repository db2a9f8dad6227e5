//! CLI command handler for importing bills and subscriptions
//!
//! Reads a JSON or CSV file, shows a preview of what parsed, and stores the
//! valid rows unless `--dry-run` is given.

use std::path::PathBuf;

use clap::Args;

use crate::error::{BillflowError, BillflowResult};
use crate::models::{Obligation, UserId};
use crate::services::import::parse_file;
use crate::services::{ImportFormat, ImportKind, ImportService};
use crate::storage::Storage;

/// Arguments for `import`
#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// File to import
    pub file: PathBuf,

    /// File format: json or csv (guessed from the extension if omitted)
    #[arg(short, long)]
    pub format: Option<String>,

    /// What the file contains: bills or subscriptions
    #[arg(short, long, default_value = "bills")]
    pub kind: String,

    /// Show what would be imported without saving anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Handle the import command
pub fn handle_import_command(storage: &Storage, user: UserId, args: &ImportArgs) -> BillflowResult<()> {
    let format = args
        .format
        .as_deref()
        .map(|f| {
            ImportFormat::parse(f).ok_or_else(|| {
                BillflowError::Validation(format!("Invalid format '{}'. Valid formats: json, csv", f))
            })
        })
        .transpose()?;
    let kind = ImportKind::parse(&args.kind).ok_or_else(|| {
        BillflowError::Validation(format!(
            "Invalid kind '{}'. Valid kinds: bills, subscriptions",
            args.kind
        ))
    })?;

    if !args.file.exists() {
        return Err(BillflowError::Import(format!(
            "File not found: {}",
            args.file.display()
        )));
    }

    let rows = parse_file(&args.file, format, kind)?;
    if rows.is_empty() {
        println!("No rows found in {}.", args.file.display());
        return Ok(());
    }

    let valid = rows.iter().filter(|r| r.result.is_ok()).count();
    let invalid = rows.len() - valid;

    println!("Import Preview for '{}'", args.file.display());
    println!("{}", "=".repeat(40));
    println!("  Valid rows:    {}", valid);
    println!("  Invalid rows:  {}", invalid);
    println!();

    for row in &rows {
        match &row.result {
            Ok(obligation) => println!(
                "  {:>4}  {:<28} {:>10}  {}  {}",
                row.row_number,
                obligation.name(),
                obligation.amount().to_string(),
                obligation.due_date(),
                describe(obligation)
            ),
            Err(message) => println!("  {:>4}  ERROR: {}", row.row_number, message),
        }
    }

    if args.dry_run {
        println!();
        println!("Dry run: nothing was saved.");
        return Ok(());
    }

    let result = ImportService::new(storage, user).import(&rows)?;

    println!();
    println!("Import Complete");
    println!("{}", "=".repeat(40));
    println!("  Imported:            {}", result.imported);
    println!("  Duplicates skipped:  {}", result.duplicates_skipped);
    println!("  Errors:              {}", result.errors);

    if !result.error_messages.is_empty() {
        println!();
        for (row, message) in &result.error_messages {
            println!("  Row {}: {}", row, message);
        }
    }

    Ok(())
}

fn describe(obligation: &Obligation) -> String {
    match obligation {
        Obligation::Bill(bill) if !bill.recurring => "one-off bill".to_string(),
        Obligation::Bill(_) => "monthly bill".to_string(),
        Obligation::Subscription(sub) => format!("{} subscription", sub.billing_cycle.to_string().to_lowercase()),
    }
}
