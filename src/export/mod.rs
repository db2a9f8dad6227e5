//! Export module for billflow
//!
//! Writes monthly plans out in several formats:
//! - CSV: schedule, projection and category totals (spreadsheet-compatible)
//! - JSON: the full plan, machine-readable and re-importable
//! - YAML: the full plan, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_category_totals_csv, export_projection_csv, export_schedule_csv};
pub use json::{export_plan_json, import_plan_json, PlanExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_plan_yaml, import_plan_yaml};
