//! Permission module
//!
//! Provides the closed permission enumeration, the inclusion graph with an
//! iterative, cycle-safe closure, and the frozen permission catalog.
//!
//! # Example
//!
//! ```rust
//! use teamfit_authz::permission::{Permission, PermissionName};
//!
//! let manage = Permission::create("manage_content").unwrap();
//! let view = Permission::create("view_content").unwrap();
//!
//! // manage_content -> edit_content -> view_content
//! assert!(manage.includes(&view));
//! assert!(!view.includes(&manage));
//! ```

pub mod catalog;
pub mod graph;
pub mod types;


pub use catalog::{Permission, PermissionCatalog, PermissionDefinition, PermissionSet};
pub use graph::InclusionGraph;
pub use types::{PermissionCategory, PermissionName};
