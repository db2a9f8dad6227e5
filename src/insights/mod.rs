//! Spending insights
//!
//! Heuristics that run over a user's whole obligation list rather than a
//! single month: duplicate detection, price-increase alerts, subscription
//! value scoring and negotiation suggestions.

pub mod duplicates;
pub mod negotiation;
pub mod price_alerts;
pub mod roi;

pub use duplicates::{find_duplicates, DuplicateGroup, DuplicateItem, DuplicateReason};
pub use negotiation::{negotiation_suggestions, NegotiationSuggestion};
pub use price_alerts::{price_alerts, PriceAlert};
pub use roi::{roi_scores, RoiRating, RoiScore};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::models::{Money, Obligation};

/// All insights for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub duplicates: Vec<DuplicateGroup>,
    pub price_alerts: Vec<PriceAlert>,
    pub roi: Vec<RoiScore>,
    pub negotiation: Vec<NegotiationSuggestion>,
    /// Monthly-equivalent spend across active obligations
    pub monthly_spend: Money,
}

impl InsightsReport {
    /// Run every heuristic over `obligations`
    pub fn generate(obligations: &[Obligation], settings: &Settings) -> Self {
        let report = Self {
            duplicates: find_duplicates(obligations),
            price_alerts: price_alerts(obligations, settings.price_alert_threshold_pct),
            roi: roi_scores(obligations),
            negotiation: negotiation_suggestions(obligations),
            monthly_spend: obligations
                .iter()
                .filter(|o| o.is_active() && o.recurring())
                .map(Obligation::monthly_cost)
                .sum(),
        };

        debug!(
            duplicates = report.duplicates.len(),
            price_alerts = report.price_alerts.len(),
            negotiation = report.negotiation.len(),
            "generated insights"
        );
        report
    }

    /// Monthly savings from dropping duplicates and negotiating
    pub fn potential_monthly_savings(&self) -> Money {
        let duplicates: Money = self.duplicates.iter().map(|g| g.potential_savings).sum();
        let negotiation: Money = self.negotiation.iter().map(|s| s.monthly_savings).sum();
        duplicates + negotiation
    }

    /// Whether any heuristic found something worth acting on
    pub fn has_findings(&self) -> bool {
        !self.duplicates.is_empty()
            || !self.price_alerts.is_empty()
            || !self.negotiation.is_empty()
            || self
                .roi
                .iter()
                .any(|s| matches!(s.rating, RoiRating::Unused | RoiRating::Poor))
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Spending Insights\n");
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!("Monthly recurring spend: {}\n", self.monthly_spend));
        output.push_str(&format!(
            "Potential monthly savings: {}\n",
            self.potential_monthly_savings()
        ));

        if !self.has_findings() {
            output.push_str("\nNothing to flag. Your obligations look lean.\n");
            return output;
        }

        if !self.duplicates.is_empty() {
            output.push_str("\nPossible duplicates\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            for group in &self.duplicates {
                output.push_str(&format!(
                    "{} ({}): save up to {}/mo\n",
                    group.key,
                    group.reason.label(),
                    group.potential_savings
                ));
                for item in &group.items {
                    output.push_str(&format!(
                        "  {:<30} {:<18} {:>12}/mo\n",
                        item.name,
                        item.category,
                        item.monthly_cost.to_string()
                    ));
                }
            }
        }

        if !self.price_alerts.is_empty() {
            output.push_str("\nPrice increases\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            output.push_str(&format!(
                "{:<30} {:>10} {:>10} {:>7} {:>11}\n",
                "Subscription", "Was", "Now", "Change", "Per year"
            ));
            for alert in &self.price_alerts {
                output.push_str(&format!(
                    "{:<30} {:>10} {:>10} {:>6.1}% {:>11}\n",
                    alert.name,
                    alert.previous_amount.to_string(),
                    alert.current_amount.to_string(),
                    alert.percent_increase,
                    format!("+{}", alert.annual_impact)
                ));
            }
        }

        let flagged: Vec<&RoiScore> = self
            .roi
            .iter()
            .filter(|s| s.rating != RoiRating::Unknown)
            .collect();
        if !flagged.is_empty() {
            output.push_str("\nSubscription value\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            output.push_str(&format!(
                "{:<30} {:>10} {:>6} {:>10} {:>10}\n",
                "Subscription", "Monthly", "Uses", "Per use", "Rating"
            ));
            for score in flagged {
                output.push_str(&format!(
                    "{:<30} {:>10} {:>6} {:>10} {:>10}\n",
                    score.name,
                    score.monthly_cost.to_string(),
                    score.usage_per_month.unwrap_or(0),
                    score
                        .cost_per_use
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    score.rating.to_string()
                ));
            }
        }

        if !self.negotiation.is_empty() {
            output.push_str("\nWorth negotiating\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            for suggestion in &self.negotiation {
                output.push_str(&format!(
                    "{:<30} {:>10}/mo  target -{:.0}%  saves {}/yr\n",
                    suggestion.name,
                    suggestion.monthly_cost.to_string(),
                    suggestion.reduction_pct,
                    suggestion.annual_savings
                ));
                output.push_str(&format!("  Tip: {}\n", suggestion.tip));
            }
        }

        output
    }
}
