//! YAML Export functionality
//!
//! Exports a monthly plan to YAML for human-readable review.

use crate::error::{BillflowError, BillflowResult};
use crate::export::json::PlanExport;
use crate::services::MonthlyPlan;
use std::io::Write;

/// Export a plan to YAML format
pub fn export_plan_yaml<W: Write>(plan: &MonthlyPlan, writer: &mut W) -> BillflowResult<()> {
    let export = PlanExport::new(plan.clone());

    writeln!(writer, "# billflow monthly plan for {}", plan.month)
        .map_err(|e| BillflowError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| BillflowError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| BillflowError::Export(e.to_string()))?;
    writeln!(writer, "# Amounts are in cents.").map_err(|e| BillflowError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BillflowError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BillflowError::Export(e.to_string()))?;

    Ok(())
}

/// Read a plan back from a YAML export
pub fn import_plan_yaml(yaml_str: &str) -> BillflowResult<PlanExport> {
    let export: PlanExport =
        serde_yaml::from_str(yaml_str).map_err(|e| BillflowError::Import(e.to_string()))?;

    export.validate().map_err(BillflowError::Import)?;

    Ok(export)
}
