//! Caller identity
//!
//! Every lifecycle operation receives the caller explicitly; the engine never
//! reads ambient session state.

use serde::{Deserialize, Serialize};

/// What a caller is allowed to do beyond acting as a reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Students and staff who report and endorse issues
    #[default]
    Member,
    /// Facility administrators who move issues through work states
    Admin,
}

/// The identity on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Stable user identity (e-mail or uid)
    pub id: String,
    /// Role granted by configuration
    #[serde(default)]
    pub role: Role,
}

impl Caller {
    /// A regular member
    #[must_use]
    pub fn member(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Member,
        }
    }

    /// An administrator
    #[must_use]
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Admin,
        }
    }

    /// Whether this caller holds the admin role
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl std::fmt::Display for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
