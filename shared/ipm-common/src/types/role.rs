//! Account Roles
//!
//! Coarse identity tiers. Roles inherit the direct permissions of the roles
//! below them: `investor ⊂ project_admin ⊂ admin`. `super_admin` sits above
//! the chain and is granted the entire catalog by the resolver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Account role of a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unprivileged visitor with a registered account.
    Guest,
    /// Investor holding positions in one or more projects.
    Investor,
    /// Manages the projects they are assigned to.
    ProjectAdmin,
    /// Platform administrator.
    Admin,
    /// Unrestricted operator; holds every permission.
    SuperAdmin,
}

impl Role {
    /// Returns all roles, lowest tier first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Guest,
            Self::Investor,
            Self::ProjectAdmin,
            Self::Admin,
            Self::SuperAdmin,
        ]
    }

    /// Wire name of the role.
    ///
    /// ```
    /// use ipm_common::Role;
    ///
    /// assert_eq!(Role::ProjectAdmin.as_str(), "project_admin");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Investor => "investor",
            Self::ProjectAdmin => "project_admin",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Roles whose direct permissions this role additionally receives.
    #[must_use]
    pub const fn inherits_from(&self) -> &'static [Self] {
        match self {
            Self::Guest | Self::Investor => &[],
            Self::ProjectAdmin => &[Self::Investor],
            Self::Admin | Self::SuperAdmin => &[Self::Investor, Self::ProjectAdmin],
        }
    }

    /// Whether viewers with this role see the identity behind anonymous investors.
    #[must_use]
    pub const fn is_admin_tier(&self) -> bool {
        matches!(self, Self::ProjectAdmin | Self::Admin | Self::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::UnknownRole(s.to_string()))
    }
}
