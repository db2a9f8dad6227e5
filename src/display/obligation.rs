//! Bill and subscription display formatting
//!
//! Formats obligations for terminal output in table views.

use crate::models::{Bill, Money, Subscription};

/// Format a list of bills as a table
pub fn format_bill_list(bills: &[Bill]) -> String {
    if bills.is_empty() {
        return "No bills found.\n\nAdd one with 'billflow bill add'.".to_string();
    }

    let name_width = bills.iter().map(|b| b.name.len()).max().unwrap_or(4).max(4);
    let category_width = bills
        .iter()
        .map(|b| b.category.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<category_width$}  {:>12}  {:<10}  {}\n",
        "Name",
        "Category",
        "Amount",
        "Due",
        "Flags",
        name_width = name_width,
        category_width = category_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<category_width$}  {:->12}  {:-<10}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        category_width = category_width,
    ));

    for bill in bills {
        let mut flags = Vec::new();
        if !bill.recurring {
            flags.push("one-off");
        }
        if bill.autopay {
            flags.push("autopay");
        }

        output.push_str(&format!(
            "{:<name_width$}  {:<category_width$}  {:>12}  {:<10}  {}\n",
            bill.name,
            bill.category,
            bill.amount.to_string(),
            bill.due_date.format("%Y-%m-%d").to_string(),
            flags.join(", "),
            name_width = name_width,
            category_width = category_width,
        ));
    }

    let total: Money = bills.iter().map(|b| b.amount).sum();
    output.push_str(&format!(
        "\n{} bill(s), {} total\n",
        bills.len(),
        total
    ));

    output
}

/// Format a list of subscriptions as a table
pub fn format_subscription_list(subscriptions: &[Subscription]) -> String {
    if subscriptions.is_empty() {
        return "No subscriptions found.\n\nAdd one with 'billflow sub add'.".to_string();
    }

    let name_width = subscriptions
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>10}  {:<9}  {:>10}  {:<10}  {}\n",
        "Name",
        "Amount",
        "Cycle",
        "Monthly",
        "Next",
        "Status",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->10}  {:-<9}  {:->10}  {:-<10}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for sub in subscriptions {
        let status = if !sub.active {
            "Cancelled".to_string()
        } else if let Some(previous) = sub.previous_amount.filter(|p| *p < sub.amount) {
            format!("was {}", previous)
        } else {
            String::new()
        };

        output.push_str(&format!(
            "{:<name_width$}  {:>10}  {:<9}  {:>10}  {:<10}  {}\n",
            sub.name,
            sub.amount.to_string(),
            sub.billing_cycle.to_string(),
            sub.monthly_cost().to_string(),
            sub.next_billing_date.format("%Y-%m-%d").to_string(),
            status,
            name_width = name_width,
        ));
    }

    let monthly: Money = subscriptions
        .iter()
        .filter(|s| s.active)
        .map(Subscription::monthly_cost)
        .sum();
    output.push_str(&format!("\nActive monthly cost: {}\n", monthly));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_empty_lists() {
        assert!(format_bill_list(&[]).starts_with("No bills found."));
        assert!(format_subscription_list(&[]).starts_with("No subscriptions found."));
    }

    #[test]
    fn test_bill_list() {
        let bills = vec![
            Bill::new("Rent", "Housing", Money::from_cents(120000), day(1)),
            Bill::one_off("Repair", "Transportation", Money::from_cents(25000), day(9)),
        ];
        let output = format_bill_list(&bills);

        assert!(output.contains("Rent"));
        assert!(output.contains("one-off"));
        assert!(output.contains("2 bill(s), $1450.00 total"));
    }

    #[test]
    fn test_subscription_list_marks_price_rise_and_cancellation() {
        let mut netflix = Subscription::new("Netflix", "Streaming", Money::from_cents(1799), day(3));
        netflix.previous_amount = Some(Money::from_cents(1549));
        let mut gym = Subscription::new("Gym", "Health & Fitness", Money::from_cents(4000), day(1));
        gym.cancel();

        let output = format_subscription_list(&[netflix, gym]);
        assert!(output.contains("was $15.49"));
        assert!(output.contains("Cancelled"));
        assert!(output.contains("Active monthly cost: $17.99"));
    }
}
