//! Duplicate obligation detection
//!
//! Flags obligations that look like the same thing entered twice (same name
//! modulo case and punctuation) and recurring charges that overlap (same
//! category and identical amount).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Money, Obligation, ObligationId};

/// Why a group was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateReason {
    SimilarName,
    SameCategoryAndAmount,
}

impl DuplicateReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SimilarName => "similar name",
            Self::SameCategoryAndAmount => "same category and amount",
        }
    }
}

/// One member of a duplicate group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateItem {
    pub id: ObligationId,
    pub name: String,
    pub category: String,
    pub monthly_cost: Money,
}

/// Two or more obligations that probably overlap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub reason: DuplicateReason,
    /// Normalized name, or "category / amount"
    pub key: String,
    pub items: Vec<DuplicateItem>,
    pub total_monthly: Money,
    /// Monthly spend saved by keeping only the cheapest member
    pub potential_savings: Money,
}

impl DuplicateGroup {
    fn new(reason: DuplicateReason, key: String, items: Vec<DuplicateItem>) -> Self {
        let total_monthly: Money = items.iter().map(|i| i.monthly_cost).sum();
        let cheapest = items
            .iter()
            .map(|i| i.monthly_cost)
            .min()
            .unwrap_or_default();
        Self {
            reason,
            key,
            items,
            total_monthly,
            potential_savings: total_monthly - cheapest,
        }
    }

    fn same_members(&self, other: &DuplicateGroup) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .all(|a| other.items.iter().any(|b| a.id == b.id))
    }
}

/// Lowercase alphanumerics only: "Netflix (4K)" and "netflix 4k" match
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Find duplicate groups among active obligations
///
/// Groups are ordered by potential savings, largest first.
pub fn find_duplicates(obligations: &[Obligation]) -> Vec<DuplicateGroup> {
    let mut by_name: BTreeMap<String, Vec<DuplicateItem>> = BTreeMap::new();
    let mut by_category_amount: BTreeMap<(String, Money), Vec<DuplicateItem>> = BTreeMap::new();

    for obligation in obligations.iter().filter(|o| o.is_active()) {
        let item = DuplicateItem {
            id: obligation.id(),
            name: obligation.name().to_string(),
            category: obligation.category().to_string(),
            monthly_cost: obligation.monthly_cost(),
        };

        let key = normalize_name(obligation.name());
        if !key.is_empty() {
            by_name.entry(key).or_default().push(item.clone());
        }

        if obligation.recurring() && obligation.amount().is_positive() {
            by_category_amount
                .entry((obligation.category().to_lowercase(), obligation.amount()))
                .or_default()
                .push(item);
        }
    }

    let mut groups: Vec<DuplicateGroup> = by_name
        .into_iter()
        .filter(|(_, items)| items.len() > 1)
        .map(|(key, items)| DuplicateGroup::new(DuplicateReason::SimilarName, key, items))
        .collect();

    for ((_, amount), items) in by_category_amount {
        if items.len() < 2 {
            continue;
        }
        let key = format!("{} / {}", items[0].category, amount);
        let group = DuplicateGroup::new(DuplicateReason::SameCategoryAndAmount, key, items);
        if !groups.iter().any(|g| g.same_members(&group)) {
            groups.push(group);
        }
    }

    groups.sort_by(|a, b| {
        b.potential_savings
            .cmp(&a.potential_savings)
            .then_with(|| a.key.cmp(&b.key))
    });
    groups
}
