//! Role name and role definition types

use crate::error::{AuthzError, Result};
use crate::permission::PermissionName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named, prioritized bundle of permissions assignable to a principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    Guest,
    User,
    PremiumUser,
    ContentCreator,
    Coach,
    TeamLeader,
    Moderator,
    Manager,
    Admin,
    SuperAdmin,
}

impl RoleName {
    /// Every role name, in declaration order
    pub const ALL: &'static [RoleName] = &[
        RoleName::Guest,
        RoleName::User,
        RoleName::PremiumUser,
        RoleName::ContentCreator,
        RoleName::Coach,
        RoleName::TeamLeader,
        RoleName::Moderator,
        RoleName::Manager,
        RoleName::Admin,
        RoleName::SuperAdmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::PremiumUser => "premium_user",
            Self::ContentCreator => "content_creator",
            Self::Coach => "coach",
            Self::TeamLeader => "team_leader",
            Self::Moderator => "moderator",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Parse a wire name, returning `None` for unknown values
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|role| role.as_str() == s)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| AuthzError::InvalidRole(s.to_string()))
    }
}

/// Role entry as supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub name: RoleName,
    pub display_name: String,
    pub description: String,

    /// Higher value means more authority
    pub priority: u32,

    /// Built-in role that must not be edited or removed by tenants
    #[serde(default)]
    pub is_system: bool,

    /// Declared base permissions (closure is computed by the catalog)
    pub permissions: Vec<PermissionName>,
}

impl RoleDefinition {
    pub fn new(
        name: RoleName,
        display_name: impl Into<String>,
        priority: u32,
        permissions: Vec<PermissionName>,
    ) -> Self {
        Self {
            name,
            display_name: display_name.into(),
            description: String::new(),
            priority,
            is_system: false,
            permissions,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }
}
