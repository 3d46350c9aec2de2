//! Catalog configuration
//!
//! A [`CatalogConfig`] describes every permission and role. It is either the
//! built-in table ([`CatalogConfig::builtin`]) or a JSON document, and is frozen
//! into a [`RoleCatalog`] by [`CatalogConfig::build`]. Building is the only step
//! that can fail: after that every query is infallible or returns a lookup error.
//!
//! # Example
//!
//! ```rust
//! use teamfit_authz::{CatalogConfig, PermissionName, RoleName};
//!
//! let json = serde_json::to_string(&CatalogConfig::builtin()).unwrap();
//! let catalog = CatalogConfig::from_json_str(&json).unwrap().build().unwrap();
//!
//! assert!(catalog.get(RoleName::Admin).has_permission(PermissionName::EditUsers));
//! ```

use crate::error::Result;
use crate::permission::PermissionCategory as Cat;
use crate::permission::PermissionName::{self, *};
use crate::permission::{PermissionCatalog, PermissionDefinition};
use crate::role::{RoleCatalog, RoleDefinition, RoleName};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

/// Complete description of the permission and role catalogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Role used when a session names an unknown role
    #[serde(default = "default_role")]
    pub default_role: RoleName,

    pub permissions: Vec<PermissionDefinition>,

    pub roles: Vec<RoleDefinition>,
}

fn default_role() -> RoleName {
    RoleName::Guest
}

impl CatalogConfig {
    /// Parse a JSON catalog document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON catalog file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate and freeze into catalogs
    ///
    /// # Errors
    ///
    /// Returns `InvalidCatalog` when a permission or role is missing or defined
    /// more than once.
    pub fn build(self) -> Result<RoleCatalog> {
        let permission_count = self.permissions.len();
        let role_count = self.roles.len();

        let permissions = PermissionCatalog::new(self.permissions)?;
        let catalog = RoleCatalog::new(self.roles, permissions, self.default_role)?;

        info!(
            "Authorization catalog loaded: {} permissions, {} roles, default role {}",
            permission_count, role_count, self.default_role
        );
        Ok(catalog)
    }

    /// The built-in permission and role table
    pub fn builtin() -> Self {
        Self {
            default_role: default_role(),
            permissions: builtin_permissions(),
            roles: builtin_roles(),
        }
    }
}

/// Process-wide catalog built from [`CatalogConfig::builtin`] on first use
pub fn builtin_catalog() -> &'static RoleCatalog {
    static CATALOG: OnceLock<RoleCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        CatalogConfig::builtin()
            .build()
            .expect("built-in catalog defines every permission and role exactly once")
    })
}

fn permission(
    name: PermissionName,
    category: Cat,
    description: &str,
    includes: &[PermissionName],
) -> PermissionDefinition {
    PermissionDefinition::new(name, category, description).with_includes(includes.to_vec())
}

fn builtin_permissions() -> Vec<PermissionDefinition> {
    vec![
        permission(ViewUsers, Cat::User, "View user accounts", &[]),
        permission(EditUsers, Cat::User, "Edit user accounts", &[ViewUsers]),
        permission(DeleteUsers, Cat::User, "Delete user accounts", &[ViewUsers]),
        permission(ManageUsers, Cat::User, "Full control over user accounts", &[ViewUsers, EditUsers, DeleteUsers]),
        permission(CreateTeam, Cat::Team, "Create new teams", &[]),
        permission(JoinTeam, Cat::Team, "Join existing teams", &[]),
        permission(InviteToTeam, Cat::Team, "Invite members to a team", &[]),
        permission(ManageTeams, Cat::Team, "Full control over teams", &[CreateTeam, JoinTeam, InviteToTeam]),
        permission(ViewContent, Cat::Content, "View published content", &[]),
        permission(CreateContent, Cat::Content, "Publish new content", &[ViewContent]),
        permission(EditContent, Cat::Content, "Edit existing content", &[ViewContent]),
        permission(DeleteContent, Cat::Content, "Remove content", &[]),
        permission(ModerateContent, Cat::Content, "Review and take down reported content", &[ViewContent, DeleteContent]),
        permission(ManageContent, Cat::Content, "Full control over content", &[CreateContent, EditContent, DeleteContent]),
        permission(ViewSettings, Cat::Settings, "View application settings", &[]),
        permission(ManageSettings, Cat::Settings, "Change application settings", &[ViewSettings]),
        permission(ManageOrganization, Cat::Settings, "Change organization-wide settings", &[ManageSettings]),
        permission(ViewAnalytics, Cat::Analytics, "View analytics dashboards", &[]),
        permission(ViewReports, Cat::Analytics, "View generated reports", &[ViewAnalytics]),
        permission(ExportAnalytics, Cat::Analytics, "Export analytics data", &[ViewReports]),
        permission(ViewProfile, Cat::Profile, "View member profiles", &[]),
        permission(ManageProfile, Cat::Profile, "Edit one's own profile", &[ViewProfile]),
        permission(ViewCompetitions, Cat::Competition, "View competitions", &[]),
        permission(JoinCompetition, Cat::Competition, "Take part in competitions", &[ViewCompetitions]),
        permission(CreateCompetition, Cat::Competition, "Organize competitions", &[ViewCompetitions]),
        permission(ManageCompetitions, Cat::Competition, "Full control over competitions", &[CreateCompetition, JoinCompetition]),
        permission(ViewGoals, Cat::Goal, "View goals", &[]),
        permission(CreateGoal, Cat::Goal, "Set new goals", &[ViewGoals]),
        permission(ManageGoals, Cat::Goal, "Full control over goals", &[CreateGoal]),
        permission(ReadMessages, Cat::Messaging, "Read messages", &[]),
        permission(SendMessages, Cat::Messaging, "Send messages", &[]),
        permission(ManageMessages, Cat::Messaging, "Moderate conversations", &[ReadMessages, SendMessages]),
        permission(ViewActivity, Cat::Activity, "View activity feeds", &[]),
        permission(LogActivity, Cat::Activity, "Record activities", &[ViewActivity]),
        permission(ManageActivity, Cat::Activity, "Edit or remove any activity", &[LogActivity]),
        permission(AccessAdminPanel, Cat::Admin, "Open the administration panel", &[]),
        permission(ViewAuditLog, Cat::Admin, "Read the audit log", &[]),
        permission(ManageRoles, Cat::Admin, "Assign roles and custom permissions", &[AccessAdminPanel]),
        permission(
            SystemAdmin,
            Cat::Admin,
            "Unrestricted access",
            &[
                ManageUsers,
                ManageTeams,
                ManageContent,
                ManageOrganization,
                ExportAnalytics,
                ManageCompetitions,
                ManageGoals,
                ManageMessages,
                ManageActivity,
                ManageRoles,
                ViewAuditLog,
            ],
        ),
    ]
}

fn builtin_roles() -> Vec<RoleDefinition> {
    vec![
        RoleDefinition::new(RoleName::SuperAdmin, "Super Admin", 100, vec![SystemAdmin])
            .with_description("Platform operator with unrestricted access")
            .system(),
        RoleDefinition::new(
            RoleName::Admin,
            "Admin",
            90,
            vec![
                ManageUsers,
                ManageTeams,
                ManageContent,
                ManageOrganization,
                ExportAnalytics,
                ManageRoles,
                ViewAuditLog,
                ManageProfile,
            ],
        )
        .with_description("Administers the organization")
        .system(),
        RoleDefinition::new(
            RoleName::Manager,
            "Manager",
            80,
            vec![
                ViewUsers,
                ManageTeams,
                ManageContent,
                ManageCompetitions,
                ManageGoals,
                ViewReports,
                ManageProfile,
                ManageMessages,
                LogActivity,
            ],
        )
        .with_description("Runs teams, competitions and content"),
        RoleDefinition::new(
            RoleName::Moderator,
            "Moderator",
            70,
            vec![ViewUsers, ModerateContent, ManageMessages, ViewActivity, ManageProfile],
        )
        .with_description("Keeps content and conversations healthy"),
        RoleDefinition::new(
            RoleName::TeamLeader,
            "Team Leader",
            60,
            vec![
                ManageTeams,
                CreateCompetition,
                JoinCompetition,
                ManageGoals,
                ViewAnalytics,
                ManageProfile,
                SendMessages,
                ReadMessages,
                LogActivity,
                ViewContent,
            ],
        )
        .with_description("Leads a team and its competitions"),
        RoleDefinition::new(
            RoleName::Coach,
            "Coach",
            50,
            vec![
                InviteToTeam,
                JoinTeam,
                CreateCompetition,
                JoinCompetition,
                ManageGoals,
                ViewAnalytics,
                ManageProfile,
                SendMessages,
                ReadMessages,
                ManageActivity,
                ViewContent,
            ],
        )
        .with_description("Guides members towards their goals"),
        RoleDefinition::new(
            RoleName::ContentCreator,
            "Content Creator",
            40,
            vec![ManageContent, ManageProfile, JoinTeam, SendMessages, ReadMessages],
        )
        .with_description("Publishes and curates content"),
        RoleDefinition::new(
            RoleName::PremiumUser,
            "Premium User",
            30,
            vec![
                ViewContent,
                ManageProfile,
                JoinTeam,
                CreateTeam,
                JoinCompetition,
                CreateGoal,
                SendMessages,
                ReadMessages,
                LogActivity,
                ViewAnalytics,
            ],
        )
        .with_description("Paying member with team creation and analytics"),
        RoleDefinition::new(
            RoleName::User,
            "User",
            20,
            vec![
                ViewContent,
                ManageProfile,
                JoinTeam,
                JoinCompetition,
                CreateGoal,
                SendMessages,
                ReadMessages,
                LogActivity,
            ],
        )
        .with_description("Regular member"),
        RoleDefinition::new(
            RoleName::Guest,
            "Guest",
            10,
            vec![ViewContent, ViewProfile, ViewCompetitions],
        )
        .with_description("Unauthenticated or unverified visitor"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthzError;

    #[test]
    fn test_builtin_builds() {
        let catalog = CatalogConfig::builtin().build().unwrap();
        assert_eq!(catalog.all_roles().len(), RoleName::ALL.len());
        assert_eq!(catalog.permissions().all().len(), PermissionName::ALL.len());
        assert!(catalog.permissions().detect_cycles().is_empty());
    }

    #[test]
    fn test_builtin_catalog_is_shared() {
        let a = builtin_catalog();
        let b = builtin_catalog();
        assert!(std::ptr::eq(a, b));
        assert!(a.permissions().ptr_eq(b.permissions()));
    }

    #[test]
    fn test_default_role_defaults_to_guest() {
        let mut value = serde_json::to_value(CatalogConfig::builtin()).unwrap();
        value.as_object_mut().unwrap().remove("default_role");

        let config: CatalogConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.default_role, RoleName::Guest);
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = CatalogConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, AuthzError::Serialization(_)));
    }

    #[test]
    fn test_unknown_permission_in_document_rejected() {
        let json = r#"{
            "permissions": [{"name": "teleport", "category": "admin", "description": ""}],
            "roles": []
        }"#;
        assert!(matches!(CatalogConfig::from_json_str(json), Err(AuthzError::Serialization(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CatalogConfig::from_path("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, AuthzError::Io(_)));
    }
}
