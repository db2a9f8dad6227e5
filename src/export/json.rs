//! JSON Export functionality
//!
//! Exports a monthly plan to JSON with schema versioning.

use crate::error::{BillflowError, BillflowResult};
use crate::models::{schedule_total, Money};
use crate::services::MonthlyPlan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A plan wrapped with export metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub plan: MonthlyPlan,
}

impl PlanExport {
    pub fn new(plan: MonthlyPlan) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            plan,
        }
    }

    /// Check the schema version and the plan's internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let plan = &self.plan;

        for entry in &plan.schedule {
            let items: Money = entry.items.iter().map(|i| i.amount).sum();
            if items != entry.total_amount {
                return Err(format!(
                    "Schedule entry {} totals {} but its items sum to {}",
                    entry.date, entry.total_amount, items
                ));
            }
        }

        let scheduled = schedule_total(&plan.schedule);
        if scheduled != plan.scheduled_total {
            return Err(format!(
                "Scheduled total {} does not match schedule ({})",
                plan.scheduled_total, scheduled
            ));
        }

        let by_category: Money = plan.category_totals.iter().map(|c| c.amount).sum();
        if by_category != scheduled {
            return Err(format!(
                "Category totals sum to {} but the schedule totals {}",
                by_category, scheduled
            ));
        }

        if plan.projection.len() as u32 != plan.month.days_in_month() {
            return Err(format!(
                "Projection has {} days but {} has {}",
                plan.projection.len(),
                plan.month,
                plan.month.days_in_month()
            ));
        }

        let mut balance = Money::zero();
        for day in &plan.projection {
            balance += day.income_for_day - day.expense_for_day;
            if balance != day.running_balance {
                return Err(format!(
                    "Running balance on {} is {} but should be {}",
                    day.date, day.running_balance, balance
                ));
            }
        }

        Ok(())
    }
}

/// Export a plan to JSON
pub fn export_plan_json<W: Write>(plan: &MonthlyPlan, writer: &mut W, pretty: bool) -> BillflowResult<()> {
    let export = PlanExport::new(plan.clone());

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| BillflowError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| BillflowError::Export(e.to_string()))?;
    Ok(())
}

/// Read a plan back from a JSON export
pub fn import_plan_json(json_str: &str) -> BillflowResult<PlanExport> {
    let export: PlanExport =
        serde_json::from_str(json_str).map_err(|e| BillflowError::Import(e.to_string()))?;

    export.validate().map_err(BillflowError::Import)?;

    Ok(export)
}
