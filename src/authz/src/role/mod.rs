//! Role module
//!
//! Roles bundle declared base permissions under a priority. A role's effective
//! permission set is the union of its declared permissions and their closures,
//! computed once per catalog.

pub mod catalog;
pub mod types;

pub use catalog::{Role, RoleCatalog};
pub use types::{RoleDefinition, RoleName};
