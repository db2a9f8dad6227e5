//! Subscription CLI commands
//!
//! Implements CLI commands for subscription management.

use clap::Subcommand;

use crate::display::format_subscription_list;
use crate::error::{BillflowError, BillflowResult};
use crate::models::{BillingCycle, UserId};
use crate::services::SubscriptionService;
use crate::storage::Storage;

use super::args::{parse_date, parse_money};

/// Subscription subcommands
#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// Add a new subscription
    Add {
        /// Subscription name
        name: String,
        /// Price per billing cycle (e.g., "15.49")
        amount: String,
        /// Next billing date (YYYY-MM-DD)
        #[arg(short, long)]
        next: String,
        /// Expense category
        #[arg(short, long, default_value = "Other")]
        category: String,
        /// Billing cycle (weekly, monthly, quarterly, yearly)
        #[arg(long, default_value = "monthly")]
        cycle: String,
    },
    /// List subscriptions
    List {
        /// Include cancelled subscriptions
        #[arg(short, long)]
        all: bool,
    },
    /// Record a new price
    Price {
        /// Subscription name or ID
        subscription: String,
        /// New price per billing cycle
        amount: String,
    },
    /// Record how many times per month you use it
    Usage {
        /// Subscription name or ID
        subscription: String,
        /// Uses per month
        uses: u32,
    },
    /// Cancel a subscription (kept on record, no longer planned)
    Cancel {
        /// Subscription name or ID
        subscription: String,
    },
    /// Remove a subscription
    #[command(alias = "rm")]
    Remove {
        /// Subscription name or ID
        subscription: String,
    },
}

/// Handle a subscription command
pub fn handle_subscription_command(
    storage: &Storage,
    user: UserId,
    cmd: SubscriptionCommands,
) -> BillflowResult<()> {
    let service = SubscriptionService::new(storage, user);

    match cmd {
        SubscriptionCommands::Add {
            name,
            amount,
            next,
            category,
            cycle,
        } => {
            let amount = parse_money(&amount, "amount")?;
            let next = parse_date(&next)?;
            let cycle = BillingCycle::parse(&cycle).ok_or_else(|| {
                BillflowError::Validation(format!(
                    "Invalid billing cycle: '{}'. Valid cycles: weekly, monthly, quarterly, yearly",
                    cycle
                ))
            })?;

            let sub = service.create(&name, &category, amount, next, cycle)?;

            println!("Created subscription: {}", sub.name);
            println!("  Amount: {} ({})", sub.amount, sub.billing_cycle);
            println!("  Monthly cost: {}", sub.monthly_cost());
            println!("  Next billing: {}", sub.next_billing_date);
            println!("  ID: {}", sub.id);
        }

        SubscriptionCommands::List { all } => {
            let subscriptions = service.list(all)?;
            print!("{}", format_subscription_list(&subscriptions));
            if !subscriptions.is_empty() {
                println!();
                println!("Monthly cost of active subscriptions: {}", service.monthly_total()?);
            }
        }

        SubscriptionCommands::Price {
            subscription,
            amount,
        } => {
            let amount = parse_money(&amount, "amount")?;
            let updated = service.change_price(&subscription, amount)?;
            match updated.previous_amount {
                Some(previous) => println!(
                    "{}: {} -> {}",
                    updated.name, previous, updated.amount
                ),
                None => println!("{}: {}", updated.name, updated.amount),
            }
        }

        SubscriptionCommands::Usage { subscription, uses } => {
            let updated = service.record_usage(&subscription, uses)?;
            println!("{}: {} use(s) per month", updated.name, uses);
        }

        SubscriptionCommands::Cancel { subscription } => {
            let cancelled = service.cancel(&subscription)?;
            println!("Cancelled subscription: {}", cancelled.name);
        }

        SubscriptionCommands::Remove { subscription } => {
            let removed = service.remove(&subscription)?;
            println!("Removed subscription: {}", removed.name);
        }
    }

    Ok(())
}
