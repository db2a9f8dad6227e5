//! Subscription value scoring
//!
//! Cost per use from self-reported monthly usage.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Money, Obligation, Subscription, SubscriptionId};

const EXCELLENT_MAX: Money = Money::from_cents(100);
const GOOD_MAX: Money = Money::from_cents(500);
const FAIR_MAX: Money = Money::from_cents(1500);

/// How much value a subscription returns for its cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoiRating {
    /// Paid for but never used
    Unused,
    Poor,
    Fair,
    Good,
    Excellent,
    /// Usage is not tracked
    Unknown,
}

impl RoiRating {
    /// Rating for a given cost per use
    pub fn for_cost_per_use(cost: Money) -> Self {
        if cost <= EXCELLENT_MAX {
            Self::Excellent
        } else if cost <= GOOD_MAX {
            Self::Good
        } else if cost <= FAIR_MAX {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for RoiRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unused => "unused",
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Value score for one subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiScore {
    pub id: SubscriptionId,
    pub name: String,
    pub monthly_cost: Money,
    pub usage_per_month: Option<u32>,
    pub cost_per_use: Option<Money>,
    pub rating: RoiRating,
}

impl RoiScore {
    pub fn score(subscription: &Subscription) -> Self {
        let monthly_cost = subscription.monthly_cost();
        let (cost_per_use, rating) = match subscription.usage_per_month {
            None => (None, RoiRating::Unknown),
            Some(0) => (None, RoiRating::Unused),
            Some(uses) => {
                let cost = monthly_cost.scale(1, i64::from(uses));
                (Some(cost), RoiRating::for_cost_per_use(cost))
            }
        };

        Self {
            id: subscription.id,
            name: subscription.name.clone(),
            monthly_cost,
            usage_per_month: subscription.usage_per_month,
            cost_per_use,
            rating,
        }
    }
}

/// Scores for active subscriptions, worst value first
pub fn roi_scores(obligations: &[Obligation]) -> Vec<RoiScore> {
    let mut scores: Vec<RoiScore> = obligations
        .iter()
        .filter_map(|o| match o {
            Obligation::Subscription(s) if s.active => Some(RoiScore::score(s)),
            _ => None,
        })
        .collect();

    scores.sort_by(|a, b| {
        a.rating
            .cmp(&b.rating)
            .then_with(|| b.monthly_cost.cmp(&a.monthly_cost))
            .then_with(|| a.name.cmp(&b.name))
    });
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn subscription(name: &str, cents: i64, usage: Option<u32>) -> Subscription {
        let mut sub = Subscription::new(
            name,
            "Streaming",
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        sub.usage_per_month = usage;
        sub
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(RoiRating::for_cost_per_use(Money::from_cents(100)), RoiRating::Excellent);
        assert_eq!(RoiRating::for_cost_per_use(Money::from_cents(101)), RoiRating::Good);
        assert_eq!(RoiRating::for_cost_per_use(Money::from_cents(1500)), RoiRating::Fair);
        assert_eq!(RoiRating::for_cost_per_use(Money::from_cents(1501)), RoiRating::Poor);
    }

    #[test]
    fn test_score() {
        let score = RoiScore::score(&subscription("Netflix", 1549, Some(20)));
        assert_eq!(score.cost_per_use, Some(Money::from_cents(77)));
        assert_eq!(score.rating, RoiRating::Excellent);

        let score = RoiScore::score(&subscription("Gym", 4000, Some(2)));
        assert_eq!(score.rating, RoiRating::Poor);
    }

    #[test]
    fn test_unused_and_unknown() {
        assert_eq!(RoiScore::score(&subscription("Idle", 999, Some(0))).rating, RoiRating::Unused);
        let unknown = RoiScore::score(&subscription("Untracked", 999, None));
        assert_eq!(unknown.rating, RoiRating::Unknown);
        assert!(unknown.cost_per_use.is_none());
    }

    #[test]
    fn test_worst_first() {
        let obligations = vec![
            Obligation::Subscription(subscription("Great", 1000, Some(30))),
            Obligation::Subscription(subscription("Idle", 999, Some(0))),
            Obligation::Subscription(subscription("Meh", 4000, Some(1))),
        ];
        let names: Vec<_> = roi_scores(&obligations).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Idle", "Meh", "Great"]);
    }
}
