//! Service layer for billflow
//!
//! The scheduling core (schedule builder, cash-flow projector, category
//! aggregator) is pure and works on plain slices. The remaining services sit
//! on top of the storage layer, handling validation and persistence.

pub mod bill;
pub mod category_totals;
pub mod import;
pub mod planner;
pub mod projection;
pub mod schedule;
pub mod subscription;

pub use bill::BillService;
pub use category_totals::CategoryAggregator;
pub use import::{ImportFormat, ImportKind, ImportResult, ImportService, ParsedRow};
pub use planner::{MonthlyPlan, PlannerService};
pub use projection::{lowest_point, shortfall_days, CashFlowProjector, IncomeModel};
pub use schedule::ScheduleBuilder;
pub use subscription::SubscriptionService;
