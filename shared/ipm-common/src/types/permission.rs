//! Permission Catalog
//!
//! The fixed set of named capabilities and the direct role grants. Inherited
//! grants are resolved by the server; this module only lists what each role
//! is given explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::role::Role;
use crate::error::Error;

/// Fine-grained capability checked independently of role text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// View own investment portfolio
    ViewPortfolio,
    /// View own profile
    ViewProfile,
    /// Update own profile and privacy settings
    UpdateProfile,
    /// Browse projects
    ViewProjects,
    /// View project spendings
    ViewSpendings,
    /// Vote on spending requests
    VoteOnSpending,
    /// Read project announcements
    ViewAnnouncements,
    /// Read own notifications
    ViewNotifications,
    /// Create a project
    CreateProject,
    /// Edit project details
    UpdateProject,
    /// Add an investor to a project
    AddInvestor,
    /// Remove an investor from a project
    RemoveInvestor,
    /// Submit a spending request
    CreateSpending,
    /// Publish a project announcement
    CreateAnnouncement,
    /// Approve a project modification request
    ApproveModification,
    /// Permanently delete a project
    DeleteProject,
    /// Manage user accounts
    ManageUsers,
    /// Assign roles to users
    ManageRoles,
    /// View every project regardless of membership
    ViewAllProjects,
    /// View the platform audit log
    ViewAuditLog,
}

impl Permission {
    /// Returns the wire name of the permission.
    ///
    /// ```
    /// use ipm_common::Permission;
    ///
    /// assert_eq!(Permission::ManageUsers.action_name(), "manage_users");
    /// ```
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::ViewPortfolio => "view_portfolio",
            Self::ViewProfile => "view_profile",
            Self::UpdateProfile => "update_profile",
            Self::ViewProjects => "view_projects",
            Self::ViewSpendings => "view_spendings",
            Self::VoteOnSpending => "vote_on_spending",
            Self::ViewAnnouncements => "view_announcements",
            Self::ViewNotifications => "view_notifications",
            Self::CreateProject => "create_project",
            Self::UpdateProject => "update_project",
            Self::AddInvestor => "add_investor",
            Self::RemoveInvestor => "remove_investor",
            Self::CreateSpending => "create_spending",
            Self::CreateAnnouncement => "create_announcement",
            Self::ApproveModification => "approve_modification",
            Self::DeleteProject => "delete_project",
            Self::ManageUsers => "manage_users",
            Self::ManageRoles => "manage_roles",
            Self::ViewAllProjects => "view_all_projects",
            Self::ViewAuditLog => "view_audit_log",
        }
    }

    /// Returns the whole catalog.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ViewPortfolio,
            Self::ViewProfile,
            Self::UpdateProfile,
            Self::ViewProjects,
            Self::ViewSpendings,
            Self::VoteOnSpending,
            Self::ViewAnnouncements,
            Self::ViewNotifications,
            Self::CreateProject,
            Self::UpdateProject,
            Self::AddInvestor,
            Self::RemoveInvestor,
            Self::CreateSpending,
            Self::CreateAnnouncement,
            Self::ApproveModification,
            Self::DeleteProject,
            Self::ManageUsers,
            Self::ManageRoles,
            Self::ViewAllProjects,
            Self::ViewAuditLog,
        ]
    }

    /// Returns a human-readable description of the permission.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ViewPortfolio => "View own investment portfolio",
            Self::ViewProfile => "View own profile",
            Self::UpdateProfile => "Update own profile and privacy settings",
            Self::ViewProjects => "Browse projects",
            Self::ViewSpendings => "View project spendings",
            Self::VoteOnSpending => "Vote on spending requests",
            Self::ViewAnnouncements => "Read project announcements",
            Self::ViewNotifications => "Read notifications",
            Self::CreateProject => "Create projects",
            Self::UpdateProject => "Edit project details",
            Self::AddInvestor => "Add investors to a project",
            Self::RemoveInvestor => "Remove investors from a project",
            Self::CreateSpending => "Submit spending requests",
            Self::CreateAnnouncement => "Publish project announcements",
            Self::ApproveModification => "Approve project modifications",
            Self::DeleteProject => "Permanently delete projects",
            Self::ManageUsers => "Manage user accounts",
            Self::ManageRoles => "Assign user roles",
            Self::ViewAllProjects => "View every project on the platform",
            Self::ViewAuditLog => "View the audit log",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_name())
    }
}

impl FromStr for Permission {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|perm| perm.action_name() == s)
            .ok_or_else(|| Error::UnknownPermission(s.to_string()))
    }
}

/// Permissions granted to a role explicitly, without inheritance.
///
/// `super_admin` has no explicit entry; the resolver grants it the catalog.
#[must_use]
pub const fn direct_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Guest => &[Permission::ViewProjects],
        Role::Investor => &[
            Permission::ViewPortfolio,
            Permission::ViewProfile,
            Permission::UpdateProfile,
            Permission::ViewProjects,
            Permission::ViewSpendings,
            Permission::VoteOnSpending,
            Permission::ViewAnnouncements,
            Permission::ViewNotifications,
        ],
        Role::ProjectAdmin => &[
            Permission::CreateProject,
            Permission::UpdateProject,
            Permission::AddInvestor,
            Permission::RemoveInvestor,
            Permission::CreateSpending,
            Permission::CreateAnnouncement,
            Permission::ApproveModification,
        ],
        Role::Admin => &[
            Permission::DeleteProject,
            Permission::ManageUsers,
            Permission::ManageRoles,
            Permission::ViewAllProjects,
            Permission::ViewAuditLog,
        ],
        Role::SuperAdmin => &[],
    }
}
