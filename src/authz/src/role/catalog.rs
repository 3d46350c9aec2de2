//! Role catalog and the `Role` value object
//!
//! Every role's effective permission set (declared permissions plus their
//! closures) is computed once when the catalog is built and shared by all
//! [`Role`] handles.

use super::types::{RoleDefinition, RoleName};
use crate::error::{AuthzError, Result};
use crate::permission::{PermissionCatalog, PermissionName, PermissionSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct RoleEntry {
    definition: RoleDefinition,
    effective: PermissionSet,
}

#[derive(Debug)]
struct RoleTable {
    entries: Vec<RoleEntry>,
    permissions: PermissionCatalog,
    default_role: RoleName,
}

impl RoleTable {
    fn entry(&self, name: RoleName) -> &RoleEntry {
        &self.entries[name.index()]
    }
}

/// Frozen registry of roles, built on top of a [`PermissionCatalog`]
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    table: Arc<RoleTable>,
}

impl RoleCatalog {
    /// Build a role catalog
    ///
    /// `default_role` is the role principals fall back to when their session names
    /// an unknown role.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCatalog` if a role is defined twice or if any value of
    /// [`RoleName`] has no definition.
    pub fn new(
        definitions: Vec<RoleDefinition>,
        permissions: PermissionCatalog,
        default_role: RoleName,
    ) -> Result<Self> {
        let mut slots: Vec<Option<RoleDefinition>> = vec![None; RoleName::ALL.len()];

        for definition in definitions {
            let slot = &mut slots[definition.name.index()];
            if slot.is_some() {
                return Err(AuthzError::InvalidCatalog(format!(
                    "Duplicate role: {}",
                    definition.name
                )));
            }
            *slot = Some(definition);
        }

        let missing: Vec<&str> = RoleName::ALL
            .iter()
            .filter(|name| slots[name.index()].is_none())
            .map(|name| name.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(AuthzError::InvalidCatalog(format!(
                "Missing role definitions: {}",
                missing.join(", ")
            )));
        }

        let entries: Vec<RoleEntry> = slots
            .into_iter()
            .flatten()
            .map(|definition| {
                let effective = permissions.expand(definition.permissions.iter().copied());
                debug!(
                    "Role {} resolved: {} declared, {} effective permissions",
                    definition.name,
                    definition.permissions.len(),
                    effective.len()
                );
                RoleEntry {
                    definition,
                    effective,
                }
            })
            .collect();

        Ok(Self {
            table: Arc::new(RoleTable {
                entries,
                permissions,
                default_role,
            }),
        })
    }

    /// Resolve a role by wire name
    ///
    /// # Errors
    ///
    /// Returns `InvalidRole` if `name` is not a known role.
    pub fn lookup(&self, name: &str) -> Result<Role> {
        let name: RoleName = name.parse()?;
        Ok(self.get(name))
    }

    pub fn get(&self, name: RoleName) -> Role {
        Role {
            name,
            table: Arc::clone(&self.table),
        }
    }

    /// Fallback role for unresolvable session roles
    pub fn default_role(&self) -> Role {
        self.get(self.table.default_role)
    }

    /// The permission catalog roles are expanded against
    pub fn permissions(&self) -> &PermissionCatalog {
        &self.table.permissions
    }

    /// Every role, in enumeration order
    pub fn all_roles(&self) -> Vec<Role> {
        RoleName::ALL.iter().map(|name| self.get(*name)).collect()
    }

    /// Every role, highest priority first
    ///
    /// Roles sharing a priority keep enumeration order.
    pub fn roles_by_priority(&self) -> Vec<Role> {
        let mut roles = self.all_roles();
        roles.sort_by(|a, b| b.priority().cmp(&a.priority()));
        roles
    }

    /// See [`Role::highest`]
    pub fn highest_role<'a, I>(&self, roles: I) -> Option<&'a Role>
    where
        I: IntoIterator<Item = &'a Role>,
    {
        Role::highest(roles)
    }
}

/// A role plus its effective permission set
///
/// Identity is the role name.
#[derive(Clone)]
pub struct Role {
    name: RoleName,
    table: Arc<RoleTable>,
}

impl Role {
    /// Resolve a role from the built-in catalog
    ///
    /// # Errors
    ///
    /// Returns `InvalidRole` if `name` is not a known role.
    pub fn create(name: &str) -> Result<Self> {
        crate::config::builtin_catalog().lookup(name)
    }

    /// Role with the highest priority, or `None` for empty input
    ///
    /// On a priority tie the role that appears first in `roles` wins.
    pub fn highest<'a, I>(roles: I) -> Option<&'a Role>
    where
        I: IntoIterator<Item = &'a Role>,
    {
        let mut best: Option<&'a Role> = None;
        for role in roles {
            match best {
                Some(current) if !role.has_higher_priority_than(current) => {}
                _ => best = Some(role),
            }
        }
        best
    }

    pub fn name(&self) -> RoleName {
        self.name
    }

    fn entry(&self) -> &RoleEntry {
        self.table.entry(self.name)
    }

    /// Declared base permissions, without closure
    pub fn permissions(&self) -> &[PermissionName] {
        &self.entry().definition.permissions
    }

    /// Declared permissions together with everything they transitively include
    pub fn permission_objects(&self) -> &PermissionSet {
        &self.entry().effective
    }

    /// True if a declared or transitively implied permission covers `name`
    pub fn has_permission(&self, name: PermissionName) -> bool {
        self.permission_objects().grants(name)
    }

    pub fn priority(&self) -> u32 {
        self.entry().definition.priority
    }

    pub fn display_name(&self) -> &str {
        &self.entry().definition.display_name
    }

    pub fn description(&self) -> &str {
        &self.entry().definition.description
    }

    pub fn is_system_role(&self) -> bool {
        self.entry().definition.is_system
    }

    pub fn has_higher_priority_than(&self, other: &Role) -> bool {
        self.priority() > other.priority()
    }

    pub(crate) fn permission_catalog(&self) -> &PermissionCatalog {
        &self.table.permissions
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Role")
            .field("name", &self.name)
            .field("priority", &self.priority())
            .finish()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{builtin_catalog, CatalogConfig};
    use crate::permission::PermissionName::*;

    #[test]
    fn test_role_closure_without_declaring_children() {
        let mut config = CatalogConfig::builtin();
        for role in &mut config.roles {
            if role.name == RoleName::ContentCreator {
                role.permissions = vec![ManageContent];
            }
        }
        let catalog = config.build().unwrap();
        let role = catalog.get(RoleName::ContentCreator);

        assert_eq!(role.permissions(), &[ManageContent]);
        assert!(role.permission_objects().contains(EditContent));
        assert!(role.permission_objects().contains(ViewContent));
        assert!(role.has_permission(ViewContent));
        assert!(!role.has_permission(ManageUsers));
    }

    #[test]
    fn test_user_role_lacks_admin_permissions() {
        let role = builtin_catalog().get(RoleName::User);

        assert_eq!(
            role.permissions(),
            &[ViewContent, ManageProfile, JoinTeam, JoinCompetition, CreateGoal, SendMessages, ReadMessages, LogActivity]
        );
        assert!(role.has_permission(ManageProfile));
        assert!(role.has_permission(ViewProfile));
        assert!(!role.has_permission(ManageUsers));
    }

    #[test]
    fn test_create_and_equality() {
        let a = Role::create("moderator").unwrap();
        let b = Role::create("moderator").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Role::create("user").unwrap());
        assert!(matches!(Role::create("root"), Err(AuthzError::InvalidRole(_))));
    }

    #[test]
    fn test_metadata_pass_through() {
        let role = builtin_catalog().get(RoleName::SuperAdmin);
        assert_eq!(role.display_name(), "Super Admin");
        assert_eq!(role.priority(), 100);
        assert!(role.is_system_role());
        assert!(!role.description().is_empty());
        assert_eq!(role.to_string(), "Super Admin");
    }

    #[test]
    fn test_roles_by_priority_descending() {
        let roles = builtin_catalog().roles_by_priority();
        assert_eq!(roles.len(), RoleName::ALL.len());
        assert_eq!(roles.first().map(Role::name), Some(RoleName::SuperAdmin));
        assert_eq!(roles.last().map(Role::name), Some(RoleName::Guest));
        assert!(roles.windows(2).all(|w| w[0].priority() >= w[1].priority()));
    }

    #[test]
    fn test_highest_role() {
        let catalog = builtin_catalog();
        let roles = vec![
            catalog.get(RoleName::User),
            catalog.get(RoleName::Manager),
            catalog.get(RoleName::Coach),
        ];

        assert_eq!(Role::highest(&roles).map(Role::name), Some(RoleName::Manager));
        assert!(Role::highest(&Vec::<Role>::new()).is_none());
    }

    #[test]
    fn test_highest_role_tie_prefers_first() {
        let mut config = CatalogConfig::builtin();
        for role in &mut config.roles {
            if matches!(role.name, RoleName::Coach | RoleName::TeamLeader) {
                role.priority = 55;
            }
        }
        let catalog = config.build().unwrap();

        let coach_first = vec![catalog.get(RoleName::Coach), catalog.get(RoleName::TeamLeader)];
        let leader_first = vec![catalog.get(RoleName::TeamLeader), catalog.get(RoleName::Coach)];

        assert_eq!(catalog.highest_role(&coach_first).map(Role::name), Some(RoleName::Coach));
        assert_eq!(catalog.highest_role(&leader_first).map(Role::name), Some(RoleName::TeamLeader));
    }

    #[test]
    fn test_priority_comparison_is_strict() {
        let catalog = builtin_catalog();
        let admin = catalog.get(RoleName::Admin);
        let user = catalog.get(RoleName::User);

        assert!(admin.has_higher_priority_than(&user));
        assert!(!user.has_higher_priority_than(&admin));
        assert!(!admin.has_higher_priority_than(&admin));
    }

    #[test]
    fn test_duplicate_and_missing_roles_rejected() {
        let mut config = CatalogConfig::builtin();
        let extra = config.roles[0].clone();
        config.roles.push(extra);
        assert!(matches!(config.build(), Err(AuthzError::InvalidCatalog(msg)) if msg.contains("Duplicate role")));

        let mut config = CatalogConfig::builtin();
        config.roles.retain(|role| role.name != RoleName::Coach);
        assert!(matches!(config.build(), Err(AuthzError::InvalidCatalog(msg)) if msg.contains("coach")));
    }
}
