//! Schedule, projection and plan display formatting

use crate::models::{schedule_total, CashFlowProjection, CategoryTotal, Money, PaymentSchedule};
use crate::services::MonthlyPlan;

use super::report::{balance_marker, double_separator, format_bar, format_percentage, separator, share_of};

/// Format a payment schedule, one block per date
pub fn format_schedule(schedule: &[PaymentSchedule]) -> String {
    if schedule.is_empty() {
        return "No payments due this month.".to_string();
    }

    let mut output = String::new();
    for entry in schedule {
        output.push_str(&format!(
            "{}  {:>12}\n",
            entry.date.format("%a %Y-%m-%d"),
            entry.total_amount.to_string()
        ));
        for item in &entry.items {
            let moved = if item.is_moved() {
                format!("  (due {})", item.due_date.format("%m-%d"))
            } else {
                String::new()
            };
            output.push_str(&format!(
                "    {:<28} {:<16} {:>10}{}\n",
                item.name,
                item.category,
                item.amount.to_string(),
                moved
            ));
        }
    }

    output.push_str(&separator(60));
    output.push('\n');
    output.push_str(&format!(
        "{} payment date(s), {} scheduled\n",
        schedule.len(),
        schedule_total(schedule)
    ));
    output
}

/// Format a day-by-day projection as a table
pub fn format_projection(projection: &[CashFlowProjection]) -> String {
    if projection.is_empty() {
        return "Nothing to project.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:>12}  {:>12}  {:>12}\n",
        "Date", "Income", "Expenses", "Balance"
    ));
    output.push_str(&format!(
        "{:-<10}  {:->12}  {:->12}  {:->12}\n",
        "", "", "", ""
    ));

    for day in projection {
        let income = if day.income_for_day.is_zero() {
            String::new()
        } else {
            day.income_for_day.to_string()
        };
        let expense = if day.expense_for_day.is_zero() {
            String::new()
        } else {
            day.expense_for_day.to_string()
        };
        output.push_str(&format!(
            "{:<10}  {:>12}  {:>12}  {:>12}{}\n",
            day.date.format("%Y-%m-%d").to_string(),
            income,
            expense,
            day.running_balance.to_string(),
            balance_marker(day.running_balance)
        ));
    }

    output
}

/// Format category totals with share bars
pub fn format_category_totals(totals: &[CategoryTotal]) -> String {
    if totals.is_empty() {
        return "No scheduled spending this month.".to_string();
    }

    let total: Money = totals.iter().map(|t| t.amount).sum();
    let max = totals
        .iter()
        .map(|t| t.amount.cents())
        .max()
        .unwrap_or(0) as f64;
    let name_width = totals
        .iter()
        .map(|t| t.category.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    for row in totals {
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:>5}  {}\n",
            row.category,
            row.amount.to_string(),
            format_percentage(share_of(row.amount, total)),
            format_bar(row.amount.cents() as f64, max, 20),
            name_width = name_width,
        ));
    }
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}\n",
        "",
        "",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:>12}\n",
        "Total",
        total.to_string(),
        name_width = name_width
    ));
    output
}

/// Format a monthly plan: summary, schedule and category breakdown
pub fn format_plan_summary(plan: &MonthlyPlan) -> String {
    let mut output = String::new();

    output.push_str(&format!("Plan for {} ({} policy)\n", plan.month, plan.policy));
    output.push_str(&double_separator(60));
    output.push('\n');
    output.push_str(&format!("{:<26} {:>14}\n", "Income", plan.monthly_income.to_string()));
    output.push_str(&format!("{:<26} {:>14}\n", "Scheduled payments", plan.scheduled_total.to_string()));
    output.push_str(&format!(
        "{:<26} {:>14}\n",
        "Due in other months",
        plan.unscheduled_total.to_string()
    ));
    output.push_str(&format!("{:<26} {:>14}\n", "Ending balance", plan.ending_balance.to_string()));
    output.push_str(&format!(
        "{:<26} {:>14}  on {}{}\n",
        "Lowest balance",
        plan.lowest_balance.to_string(),
        plan.lowest_balance_date.format("%Y-%m-%d"),
        balance_marker(plan.lowest_balance)
    ));

    let short = plan.shortfall_day_count();
    if short > 0 {
        output.push_str(&format!(
            "\nWarning: balance is negative on {} day(s). Try a different policy.\n",
            short
        ));
    }

    output.push_str("\nSchedule\n");
    output.push_str(&separator(60));
    output.push('\n');
    output.push_str(&format_schedule(&plan.schedule));
    output.push('\n');

    output.push_str("\nBy category\n");
    output.push_str(&separator(60));
    output.push('\n');
    output.push_str(&format_category_totals(&plan.category_totals));
    output.push('\n');

    output
}
