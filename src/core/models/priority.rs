//! Issue priority levels
//!
//! Ordered `Low < Medium < High < Critical`. Priority only ever moves up
//! once an issue exists (crowd escalation and reopen escalation).

use serde::{Deserialize, Serialize};

/// Issue priority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Priority {
    /// Cosmetic or low-impact problems
    Low,
    /// Default for anything not matched by a keyword rule
    #[default]
    Medium,
    /// Water and power problems
    High,
    /// Safety hazards
    Critical,
}

impl Priority {
    /// All priorities, lowest first
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// One level up the scale, capped at `Critical`
    #[must_use]
    pub const fn escalated(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Critical => Self::Critical,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" | "crit" => Ok(Self::Critical),
            _ => Err(format!("Invalid priority: {s}. Use: low, medium, high, critical")),
        }
    }
}
