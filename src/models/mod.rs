//! Core data models for billflow
//!
//! This module contains the data structures of the bill-tracking domain:
//! bills, subscriptions, categories, months, and the derived schedule and
//! projection values.

pub mod category;
pub mod ids;
pub mod money;
pub mod obligation;
pub mod period;
pub mod policy;
pub mod schedule;

pub use category::{default_categories, Category};
pub use ids::{BillId, ObligationId, SubscriptionId, UserId};
pub use money::Money;
pub use obligation::{BillingCycle, Bill, Obligation, Subscription, FALLBACK_CATEGORY};
pub use period::YearMonth;
pub use policy::DistributionPolicy;
pub use schedule::{schedule_total, CashFlowProjection, CategoryTotal, ObligationRef, PaymentSchedule};
