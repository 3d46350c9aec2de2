//! Permission name and category definitions
//!
//! Both enumerations are closed: every value the engine can reason about is listed
//! here, and the wire form of each value is its `snake_case` name.

use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! permission_names {
    ($($variant:ident => $wire:literal),+ $(,)?) => {
        /// Atomic, named capability a principal may hold
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum PermissionName {
            $($variant),+
        }

        impl PermissionName {
            /// Every permission name, in declaration order
            pub const ALL: &'static [PermissionName] = &[$(PermissionName::$variant),+];

            /// Wire name (e.g. `"manage_users"`)
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(PermissionName::$variant => $wire),+
                }
            }

            /// Parse a wire name, returning `None` for unknown values
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($wire => Some(PermissionName::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

permission_names! {
    // user
    ViewUsers => "view_users",
    EditUsers => "edit_users",
    DeleteUsers => "delete_users",
    ManageUsers => "manage_users",
    // team
    CreateTeam => "create_team",
    JoinTeam => "join_team",
    InviteToTeam => "invite_to_team",
    ManageTeams => "manage_teams",
    // content
    ViewContent => "view_content",
    CreateContent => "create_content",
    EditContent => "edit_content",
    DeleteContent => "delete_content",
    ModerateContent => "moderate_content",
    ManageContent => "manage_content",
    // settings
    ViewSettings => "view_settings",
    ManageSettings => "manage_settings",
    ManageOrganization => "manage_organization",
    // analytics
    ViewAnalytics => "view_analytics",
    ViewReports => "view_reports",
    ExportAnalytics => "export_analytics",
    // profile
    ViewProfile => "view_profile",
    ManageProfile => "manage_profile",
    // competition
    ViewCompetitions => "view_competitions",
    JoinCompetition => "join_competition",
    CreateCompetition => "create_competition",
    ManageCompetitions => "manage_competitions",
    // goal
    ViewGoals => "view_goals",
    CreateGoal => "create_goal",
    ManageGoals => "manage_goals",
    // messaging
    ReadMessages => "read_messages",
    SendMessages => "send_messages",
    ManageMessages => "manage_messages",
    // activity
    ViewActivity => "view_activity",
    LogActivity => "log_activity",
    ManageActivity => "manage_activity",
    // admin
    AccessAdminPanel => "access_admin_panel",
    ViewAuditLog => "view_audit_log",
    ManageRoles => "manage_roles",
    SystemAdmin => "system_admin",
}

impl PermissionName {
    /// Position in [`PermissionName::ALL`], used to index catalog tables
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PermissionName {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| AuthzError::InvalidPermission(s.to_string()))
    }
}

/// Functional area a permission belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    User,
    Team,
    Content,
    Settings,
    Analytics,
    Profile,
    Competition,
    Goal,
    Messaging,
    Activity,
    Admin,
}

impl PermissionCategory {
    pub const ALL: &'static [PermissionCategory] = &[
        PermissionCategory::User,
        PermissionCategory::Team,
        PermissionCategory::Content,
        PermissionCategory::Settings,
        PermissionCategory::Analytics,
        PermissionCategory::Profile,
        PermissionCategory::Competition,
        PermissionCategory::Goal,
        PermissionCategory::Messaging,
        PermissionCategory::Activity,
        PermissionCategory::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Team => "team",
            Self::Content => "content",
            Self::Settings => "settings",
            Self::Analytics => "analytics",
            Self::Profile => "profile",
            Self::Competition => "competition",
            Self::Goal => "goal",
            Self::Messaging => "messaging",
            Self::Activity => "activity",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for PermissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PermissionCategory {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| AuthzError::InvalidCatalog(format!("Unknown permission category: {}", s)))
    }
}
