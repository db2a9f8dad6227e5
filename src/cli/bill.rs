//! Bill CLI commands
//!
//! Implements CLI commands for bill management.

use clap::Subcommand;

use crate::display::format_bill_list;
use crate::error::BillflowResult;
use crate::models::UserId;
use crate::services::BillService;
use crate::storage::Storage;

use super::args::{parse_date, parse_money};

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// Add a new bill
    Add {
        /// Bill name
        name: String,
        /// Amount (e.g., "85.50")
        amount: String,
        /// Next due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: String,
        /// Expense category
        #[arg(short, long, default_value = "Other")]
        category: String,
        /// The bill does not repeat monthly
        #[arg(long)]
        one_off: bool,
    },
    /// List all bills
    List,
    /// Change a bill's amount or due date
    Edit {
        /// Bill name or ID
        bill: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },
    /// Remove a bill
    #[command(alias = "rm")]
    Remove {
        /// Bill name or ID
        bill: String,
    },
}

/// Handle a bill command
pub fn handle_bill_command(storage: &Storage, user: UserId, cmd: BillCommands) -> BillflowResult<()> {
    let service = BillService::new(storage, user);

    match cmd {
        BillCommands::Add {
            name,
            amount,
            due,
            category,
            one_off,
        } => {
            let amount = parse_money(&amount, "amount")?;
            let due = parse_date(&due)?;
            let bill = service.create(&name, &category, amount, due, !one_off)?;

            println!("Created bill: {}", bill.name);
            println!("  Amount: {}", bill.amount);
            println!("  Due: {}", bill.due_date);
            println!("  Category: {}", bill.category);
            println!("  Recurring: {}", if bill.recurring { "Yes" } else { "No" });
            println!("  ID: {}", bill.id);
        }

        BillCommands::List => {
            let bills = service.list()?;
            print!("{}", format_bill_list(&bills));
        }

        BillCommands::Edit { bill, amount, due } => {
            if amount.is_none() && due.is_none() {
                println!("No changes specified. Use --amount or --due.");
                return Ok(());
            }

            let amount = amount.map(|a| parse_money(&a, "amount")).transpose()?;
            let due = due.map(|d| parse_date(&d)).transpose()?;
            let updated = service.update(&bill, amount, due)?;
            println!("Updated bill: {} ({} due {})", updated.name, updated.amount, updated.due_date);
        }

        BillCommands::Remove { bill } => {
            let removed = service.remove(&bill)?;
            println!("Removed bill: {}", removed.name);
        }
    }

    Ok(())
}
