//! Per-principal authorization context
//!
//! A [`PrincipalAuthorization`] layers ad hoc custom grants on top of exactly one
//! role. Construction never fails:
//!
//! - an unknown role name falls back to the catalog's default role
//! - unknown custom permission names are dropped
//!
//! The merged effective set is computed on first query and cached for the lifetime
//! of the instance.

use crate::permission::{PermissionName, PermissionSet};
use crate::role::{Role, RoleCatalog};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Effective authorization of one principal: a role plus custom grants
#[derive(Clone)]
pub struct PrincipalAuthorization {
    role: Role,

    /// Custom grants exactly as supplied by the session
    custom_permissions: Vec<String>,

    /// Custom grants recognized by the catalog, deduplicated, in input order
    valid_custom: Vec<PermissionName>,

    effective: OnceLock<Arc<PermissionSet>>,
}

impl PrincipalAuthorization {
    /// Build an authorization context against the built-in catalog
    pub fn create<S: AsRef<str>>(role_name: &str, custom_permissions: &[S]) -> Self {
        Self::from_catalog(crate::config::builtin_catalog(), role_name, custom_permissions)
    }

    /// Build an authorization context against `catalog`
    pub fn from_catalog<S: AsRef<str>>(
        catalog: &RoleCatalog,
        role_name: &str,
        custom_permissions: &[S],
    ) -> Self {
        let role = match catalog.lookup(role_name) {
            Ok(role) => role,
            Err(e) => {
                let fallback = catalog.default_role();
                warn!("{}; falling back to role {}", e, fallback.name());
                fallback
            }
        };

        let mut valid_custom: Vec<PermissionName> = Vec::new();
        for raw in custom_permissions {
            match PermissionName::parse(raw.as_ref()) {
                Some(name) if !valid_custom.contains(&name) => valid_custom.push(name),
                Some(_) => {}
                None => debug!("Dropping unknown custom permission: {}", raw.as_ref()),
            }
        }

        Self {
            role,
            custom_permissions: custom_permissions
                .iter()
                .map(|raw| raw.as_ref().to_string())
                .collect(),
            valid_custom,
            effective: OnceLock::new(),
        }
    }

    /// Seed the cached effective set with one computed elsewhere
    pub(crate) fn with_effective(self, effective: Arc<PermissionSet>) -> Self {
        // A fresh instance has an empty cell, so this set cannot fail.
        let _ = self.effective.set(effective);
        self
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Custom grants as declared, including names the catalog does not know
    pub fn custom_permissions(&self) -> &[String] {
        &self.custom_permissions
    }

    /// Custom grants the catalog recognized
    pub fn valid_custom_permissions(&self) -> &[PermissionName] {
        &self.valid_custom
    }

    /// Role permissions united with the closure of the valid custom grants
    pub fn permission_objects(&self) -> &PermissionSet {
        self.shared_permission_objects()
    }

    pub(crate) fn shared_permission_objects(&self) -> &Arc<PermissionSet> {
        self.effective.get_or_init(|| {
            let custom = self
                .role
                .permission_catalog()
                .expand(self.valid_custom.iter().copied());
            Arc::new(self.role.permission_objects().union(&custom))
        })
    }

    pub fn has_permission(&self, name: PermissionName) -> bool {
        self.permission_objects().contains(name)
    }

    /// False for an empty `names`
    pub fn has_any_permission(&self, names: &[PermissionName]) -> bool {
        names.iter().any(|name| self.has_permission(*name))
    }

    /// True for an empty `names`
    pub fn has_all_permissions(&self, names: &[PermissionName]) -> bool {
        names.iter().all(|name| self.has_permission(*name))
    }
}

impl fmt::Display for PrincipalAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role.display_name())?;
        if !self.custom_permissions.is_empty() {
            write!(f, " (+{} custom)", self.custom_permissions.len())?;
        }
        Ok(())
    }
}

impl fmt::Debug for PrincipalAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrincipalAuthorization")
            .field("role", &self.role.name())
            .field("custom_permissions", &self.custom_permissions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::permission::PermissionName::*;
    use crate::role::RoleName;

    #[test]
    fn test_union_of_role_and_custom() {
        let auth = PrincipalAuthorization::create("user", &["manage_content"]);

        assert!(auth.has_permission(ManageProfile));
        assert!(auth.has_permission(ManageContent));
        assert!(auth.has_permission(EditContent));
        assert!(!auth.has_permission(ManageUsers));
    }

    #[test]
    fn test_quantifiers() {
        let auth = PrincipalAuthorization::create("user", &["manage_content", "view_analytics"]);

        assert!(auth.has_all_permissions(&[ManageProfile, ViewAnalytics]));
        assert!(!auth.has_all_permissions(&[ManageProfile, ManageUsers]));
        assert!(auth.has_any_permission(&[ManageUsers, ViewAnalytics]));
        assert!(!auth.has_any_permission(&[ManageUsers, SystemAdmin]));
        assert!(!auth.has_any_permission(&[]));
        assert!(auth.has_all_permissions(&[]));
    }

    #[test]
    fn test_unknown_role_falls_back_to_default() {
        let auth = PrincipalAuthorization::create::<&str>("galactic_emperor", &[]);

        assert_eq!(auth.role().name(), RoleName::Guest);
        assert!(auth.has_permission(ViewContent));
        assert!(!auth.has_permission(ManageProfile));
    }

    #[test]
    fn test_fallback_follows_configured_default() {
        let mut config = CatalogConfig::builtin();
        config.default_role = RoleName::User;
        let catalog = config.build().unwrap();

        let auth = PrincipalAuthorization::from_catalog::<&str>(&catalog, "", &[]);
        assert_eq!(auth.role().name(), RoleName::User);
    }

    #[test]
    fn test_unknown_custom_permissions_dropped() {
        let auth = PrincipalAuthorization::create("guest", &["fly", "view_analytics", "view_analytics"]);

        assert_eq!(auth.custom_permissions().len(), 3);
        assert_eq!(auth.valid_custom_permissions(), &[ViewAnalytics]);
        assert!(auth.has_permission(ViewAnalytics));
    }

    #[test]
    fn test_permission_objects_idempotent() {
        let auth = PrincipalAuthorization::create("coach", &["export_analytics"]);

        let first = auth.permission_objects().clone();
        let second = auth.permission_objects();
        assert_eq!(&first, second);
        assert!(Arc::ptr_eq(auth.shared_permission_objects(), auth.shared_permission_objects()));
    }

    #[test]
    fn test_display() {
        let plain = PrincipalAuthorization::create::<&str>("user", &[]);
        assert_eq!(plain.to_string(), "User");

        let custom = PrincipalAuthorization::create("user", &["manage_content", "view_analytics"]);
        assert_eq!(custom.to_string(), "User (+2 custom)");
    }

    #[test]
    fn test_display_counts_declared_not_expanded() {
        let auth = PrincipalAuthorization::create("guest", &["system_admin"]);
        assert!(auth.permission_objects().len() > 10);
        assert_eq!(auth.to_string(), "Guest (+1 custom)");
    }
}
