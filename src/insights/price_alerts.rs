//! Price-increase alerts for subscriptions

use serde::{Deserialize, Serialize};

use crate::models::{Money, Obligation, Subscription, SubscriptionId};

/// A subscription whose price went up by at least the alert threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAlert {
    pub id: SubscriptionId,
    pub name: String,
    pub previous_amount: Money,
    pub current_amount: Money,
    pub increase: Money,
    pub percent_increase: f64,
    /// Extra spend per year at the current billing cycle
    pub annual_impact: Money,
}

impl PriceAlert {
    /// Build an alert if the increase reaches `threshold_pct`
    pub fn check(subscription: &Subscription, threshold_pct: f64) -> Option<Self> {
        let previous = subscription.previous_amount?;
        if !previous.is_positive() || subscription.amount <= previous {
            return None;
        }

        let increase = subscription.amount - previous;
        let percent_increase = increase.cents() as f64 / previous.cents() as f64 * 100.0;
        if percent_increase < threshold_pct {
            return None;
        }

        Some(Self {
            id: subscription.id,
            name: subscription.name.clone(),
            previous_amount: previous,
            current_amount: subscription.amount,
            increase,
            percent_increase,
            annual_impact: increase.scale(subscription.billing_cycle.charges_per_year(), 1),
        })
    }
}

/// Alerts for active subscriptions, largest annual impact first
pub fn price_alerts(obligations: &[Obligation], threshold_pct: f64) -> Vec<PriceAlert> {
    let mut alerts: Vec<PriceAlert> = obligations
        .iter()
        .filter_map(|o| match o {
            Obligation::Subscription(s) if s.active => PriceAlert::check(s, threshold_pct),
            _ => None,
        })
        .collect();

    alerts.sort_by(|a, b| {
        b.annual_impact
            .cmp(&a.annual_impact)
            .then_with(|| a.name.cmp(&b.name))
    });
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillingCycle;
    use chrono::NaiveDate;

    fn subscription(name: &str, previous: Option<i64>, current: i64) -> Subscription {
        let mut sub = Subscription::new(
            name,
            "Streaming",
            Money::from_cents(current),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        sub.previous_amount = previous.map(Money::from_cents);
        sub
    }

    #[test]
    fn test_alert_over_threshold() {
        let alert = PriceAlert::check(&subscription("Netflix", Some(1549), 1799), 5.0).unwrap();
        assert_eq!(alert.increase.cents(), 250);
        assert!((alert.percent_increase - 16.14).abs() < 0.01);
        assert_eq!(alert.annual_impact.cents(), 3000);
    }

    #[test]
    fn test_small_increase_ignored() {
        // 2% increase
        assert!(PriceAlert::check(&subscription("Cloud", Some(1000), 1020), 5.0).is_none());
        assert!(PriceAlert::check(&subscription("Cloud", Some(1000), 1020), 1.0).is_some());
    }

    #[test]
    fn test_no_history_or_decrease() {
        assert!(PriceAlert::check(&subscription("New", None, 1000), 5.0).is_none());
        assert!(PriceAlert::check(&subscription("Cheaper", Some(1200), 1000), 5.0).is_none());
        assert!(PriceAlert::check(&subscription("Was free", Some(0), 1000), 5.0).is_none());
    }

    #[test]
    fn test_yearly_cycle_impact() {
        let mut sub = subscription("Domain", Some(1200), 1500);
        sub.billing_cycle = BillingCycle::Yearly;
        let alert = PriceAlert::check(&sub, 5.0).unwrap();
        assert_eq!(alert.annual_impact.cents(), 300);
    }

    #[test]
    fn test_sorted_by_impact() {
        let obligations = vec![
            Obligation::Subscription(subscription("Small", Some(1000), 1100)),
            Obligation::Subscription(subscription("Big", Some(5000), 6000)),
        ];
        let alerts = price_alerts(&obligations, 5.0);
        let names: Vec<_> = alerts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Big", "Small"]);
    }
}
