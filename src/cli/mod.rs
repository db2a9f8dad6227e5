//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod args;
pub mod bill;
pub mod config;
pub mod import;
pub mod insights;
pub mod plan;
pub mod subscription;

pub use args::{parse_date, parse_money, parse_policy, PlanArgs, PlanRequest};
pub use bill::{handle_bill_command, BillCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use import::{handle_import_command, ImportArgs};
pub use insights::{handle_insights_command, InsightsArgs};
pub use plan::{
    handle_categories_command, handle_plan_command, handle_project_command, handle_schedule_command,
    PlanCommandArgs, ProjectArgs,
};
pub use subscription::{handle_subscription_command, SubscriptionCommands};
