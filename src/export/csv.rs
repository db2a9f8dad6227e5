//! CSV Export functionality
//!
//! Exports the payment schedule and the daily projection to CSV.

use crate::error::{BillflowError, BillflowResult};
use crate::models::{CashFlowProjection, CategoryTotal, PaymentSchedule};
use std::io::Write;

fn export_err(e: impl std::fmt::Display) -> BillflowError {
    BillflowError::Export(e.to_string())
}

/// Export one row per scheduled item
pub fn export_schedule_csv<W: Write>(schedule: &[PaymentSchedule], writer: W) -> BillflowResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(["Date", "Name", "Category", "Amount", "Due Date", "Kind", "ID"])
        .map_err(export_err)?;

    for entry in schedule {
        for item in &entry.items {
            let kind = match item.id {
                crate::models::ObligationId::Bill(_) => "bill",
                crate::models::ObligationId::Subscription(_) => "subscription",
            };
            csv.write_record([
                entry.key(),
                item.name.clone(),
                item.category.clone(),
                format!("{:.2}", item.amount.as_decimal_f64()),
                item.due_date.format("%Y-%m-%d").to_string(),
                kind.to_string(),
                item.id.to_string(),
            ])
            .map_err(export_err)?;
        }
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

/// Export one row per projected day
pub fn export_projection_csv<W: Write>(projection: &[CashFlowProjection], writer: W) -> BillflowResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(["Date", "Income", "Expenses", "Net", "Balance"])
        .map_err(export_err)?;

    for day in projection {
        csv.write_record([
            day.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", day.income_for_day.as_decimal_f64()),
            format!("{:.2}", day.expense_for_day.as_decimal_f64()),
            format!("{:.2}", day.net().as_decimal_f64()),
            format!("{:.2}", day.running_balance.as_decimal_f64()),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

/// Export category totals
pub fn export_category_totals_csv<W: Write>(totals: &[CategoryTotal], writer: W) -> BillflowResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(["Category", "Amount"]).map_err(export_err)?;
    for row in totals {
        csv.write_record([row.category.clone(), format!("{:.2}", row.amount.as_decimal_f64())])
            .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}
