//! Payment distribution policy
//!
//! Controls where in the month the scheduler places obligations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How payments are distributed across a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistributionPolicy {
    /// Pay everything right after the first paycheck
    Early,
    /// Keep each obligation on its own due date
    #[default]
    Balanced,
    /// Hold payments until late in the month
    Late,
}

impl DistributionPolicy {
    /// All policies, in display order
    pub const ALL: [DistributionPolicy; 3] = [Self::Early, Self::Balanced, Self::Late];

    /// Parse a policy from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "early" | "front" | "front-load" => Some(Self::Early),
            "balanced" | "even" | "due" => Some(Self::Balanced),
            "late" | "back" | "back-load" => Some(Self::Late),
            _ => None,
        }
    }

    /// Short description for help output and reports
    pub fn description(&self) -> &'static str {
        match self {
            Self::Early => "Pay all bills early in the month",
            Self::Balanced => "Pay each bill on its due date",
            Self::Late => "Pay all bills late in the month",
        }
    }
}

impl fmt::Display for DistributionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Early => write!(f, "early"),
            Self::Balanced => write!(f, "balanced"),
            Self::Late => write!(f, "late"),
        }
    }
}
