//! Display formatting for terminal output
//!
//! Provides utilities for formatting obligations, schedules, projections and
//! plans as plain-text tables.

pub mod obligation;
pub mod plan;
pub mod report;

pub use obligation::{format_bill_list, format_subscription_list};
pub use plan::{format_category_totals, format_plan_summary, format_projection, format_schedule};
