//! Bill negotiation suggestions
//!
//! Providers in a few categories routinely lower rates when asked. Each
//! category carries a typical achievable reduction and one tip.

use serde::{Deserialize, Serialize};

use crate::models::{Money, Obligation, ObligationId};

/// Below this monthly cost a negotiation call is not worth it
pub const MIN_MONTHLY_COST: Money = Money::from_cents(3000);

/// A category where rates are commonly negotiable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegotiableCategory {
    pub category: &'static str,
    pub reduction_pct: f64,
    pub tip: &'static str,
}

pub const NEGOTIABLE_CATEGORIES: [NegotiableCategory; 5] = [
    NegotiableCategory {
        category: "Internet",
        reduction_pct: 20.0,
        tip: "Quote a competitor's introductory price and ask for retention",
    },
    NegotiableCategory {
        category: "Phone",
        reduction_pct: 15.0,
        tip: "Ask whether a cheaper plan covers your actual data usage",
    },
    NegotiableCategory {
        category: "Insurance",
        reduction_pct: 12.0,
        tip: "Get two outside quotes and ask about bundling or higher deductibles",
    },
    NegotiableCategory {
        category: "Utilities",
        reduction_pct: 8.0,
        tip: "Ask about budget billing, off-peak rates and assistance programs",
    },
    NegotiableCategory {
        category: "Streaming",
        reduction_pct: 10.0,
        tip: "Switch to an ad-supported tier or rotate services month to month",
    },
];

/// Look up a category case-insensitively
pub fn negotiable(category: &str) -> Option<&'static NegotiableCategory> {
    NEGOTIABLE_CATEGORIES
        .iter()
        .find(|c| c.category.eq_ignore_ascii_case(category.trim()))
}

/// Estimated savings from negotiating one obligation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationSuggestion {
    pub id: ObligationId,
    pub name: String,
    pub category: String,
    pub monthly_cost: Money,
    pub reduction_pct: f64,
    pub monthly_savings: Money,
    pub annual_savings: Money,
    pub tip: String,
}

/// Suggestions for active obligations, biggest annual savings first
pub fn negotiation_suggestions(obligations: &[Obligation]) -> Vec<NegotiationSuggestion> {
    let mut suggestions: Vec<NegotiationSuggestion> = obligations
        .iter()
        .filter(|o| o.is_active() && o.recurring())
        .filter_map(|o| {
            let target = negotiable(o.category())?;
            let monthly_cost = o.monthly_cost();
            if monthly_cost < MIN_MONTHLY_COST {
                return None;
            }

            let monthly_savings = monthly_cost.percent(target.reduction_pct);
            Some(NegotiationSuggestion {
                id: o.id(),
                name: o.name().to_string(),
                category: target.category.to_string(),
                monthly_cost,
                reduction_pct: target.reduction_pct,
                monthly_savings,
                annual_savings: monthly_savings.scale(12, 1),
                tip: target.tip.to_string(),
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.annual_savings
            .cmp(&a.annual_savings)
            .then_with(|| a.name.cmp(&b.name))
    });
    suggestions
}
