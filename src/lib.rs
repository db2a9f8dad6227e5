//! billflow - bill and subscription tracking with cash-flow planning
//!
//! This library provides the core of the billflow CLI: it stores a user's
//! bills and subscriptions, lays them out on a monthly payment schedule under
//! an early, balanced or late policy, projects the day-by-day balance, and
//! totals spending by category.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, months, bills, subscriptions, schedules)
//! - `storage`: JSON file storage layer and session resolution
//! - `services`: Scheduling, projection, aggregation and CRUD services
//! - `insights`: Duplicate, price-increase, ROI and negotiation heuristics
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML output
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use billflow::config::{paths::BillflowPaths, settings::Settings};
//! use billflow::services::PlannerService;
//!
//! let paths = BillflowPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let plan = PlannerService::new(&store, &settings).plan(&obligations, month, income, policy)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod insights;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BillflowError, BillflowResult};
