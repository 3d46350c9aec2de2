//! # TeamFit Authorization Engine
//!
//! Hierarchical permission and role resolution for the TeamFit platform.
//!
//! ## Features
//!
//! - **Closed catalogs**: typed permission and role enumerations backed by a frozen,
//!   enum-indexed table
//! - **Transitive inclusion**: granting one permission grants everything it implies,
//!   computed once per catalog with an iterative, cycle-safe closure
//! - **Role priorities**: ordering and highest-role selection
//! - **Principal authorization**: a role plus ad hoc custom grants, with lenient
//!   handling of unknown session data
//! - **Shared memoization**: a `DashMap`-backed resolver for request handlers
//! - **JSON catalogs**: load and validate catalogs with `serde`
//!
//! ## Example
//!
//! ```rust
//! use teamfit_authz::{PermissionName, PrincipalAuthorization};
//!
//! let auth = PrincipalAuthorization::create("user", &["manage_content"]);
//!
//! assert!(auth.has_permission(PermissionName::ManageProfile)); // from the role
//! assert!(auth.has_permission(PermissionName::EditContent)); // implied by the grant
//! assert!(!auth.has_permission(PermissionName::ManageUsers));
//! assert_eq!(auth.to_string(), "User (+1 custom)");
//! ```

pub mod config;
pub mod error;
pub mod permission;
pub mod principal;
pub mod resolver;
pub mod role;

// Re-export commonly used types
pub use config::{builtin_catalog, CatalogConfig};
pub use error::{AuthzError, Result};
pub use permission::{
    Permission, PermissionCatalog, PermissionCategory, PermissionDefinition, PermissionName,
    PermissionSet,
};
pub use principal::PrincipalAuthorization;
pub use resolver::{AuthorizationResolver, CacheStats};
pub use role::{Role, RoleCatalog, RoleDefinition, RoleName};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
