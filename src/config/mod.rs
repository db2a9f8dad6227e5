//! Configuration module for billflow
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Scheduling preferences and the category table

pub mod paths;
pub mod settings;

pub use paths::BillflowPaths;
pub use settings::Settings;
