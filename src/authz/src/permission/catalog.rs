//! Permission catalog and the `Permission` value object
//!
//! The catalog is a frozen table indexed by [`PermissionName`] discriminant. Each
//! entry carries the permission's metadata together with its transitive closure,
//! computed once when the catalog is built. [`Permission`] handles share that table
//! through an `Arc`, so resolving the same name twice yields the same underlying
//! entry and closures are never recomputed.

use super::graph::InclusionGraph;
use super::types::{PermissionCategory, PermissionName};
use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, warn};

/// Catalog entry as supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDefinition {
    pub name: PermissionName,
    pub category: PermissionCategory,
    pub description: String,

    /// Permissions directly implied by this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<PermissionName>,
}

impl PermissionDefinition {
    pub fn new(
        name: PermissionName,
        category: PermissionCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name,
            category,
            description: description.into(),
            includes: Vec::new(),
        }
    }

    /// Set the directly implied permissions
    pub fn with_includes(mut self, includes: Vec<PermissionName>) -> Self {
        self.includes = includes;
        self
    }
}

#[derive(Debug)]
struct PermissionEntry {
    category: PermissionCategory,
    description: String,
    closure: BTreeSet<PermissionName>,
}

#[derive(Debug)]
struct PermissionTable {
    entries: Vec<PermissionEntry>,
    graph: InclusionGraph,
}

impl PermissionTable {
    fn entry(&self, name: PermissionName) -> &PermissionEntry {
        &self.entries[name.index()]
    }
}

/// Frozen registry of every permission, its metadata and its inclusion graph
///
/// Cloning is cheap and every clone refers to the same table.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    table: Arc<PermissionTable>,
}

impl PermissionCatalog {
    /// Build a catalog from definitions
    ///
    /// # Errors
    ///
    /// Returns `InvalidCatalog` if a permission is defined twice or if any value of
    /// [`PermissionName`] has no definition.
    pub fn new(definitions: Vec<PermissionDefinition>) -> Result<Self> {
        let mut slots: Vec<Option<PermissionDefinition>> = vec![None; PermissionName::ALL.len()];

        for definition in definitions {
            let slot = &mut slots[definition.name.index()];
            if slot.is_some() {
                return Err(AuthzError::InvalidCatalog(format!(
                    "Duplicate permission: {}",
                    definition.name
                )));
            }
            *slot = Some(definition);
        }

        let missing: Vec<&str> = PermissionName::ALL
            .iter()
            .filter(|name| slots[name.index()].is_none())
            .map(|name| name.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(AuthzError::InvalidCatalog(format!(
                "Missing permission definitions: {}",
                missing.join(", ")
            )));
        }

        let definitions: Vec<PermissionDefinition> = slots.into_iter().flatten().collect();

        let mut graph = InclusionGraph::new();
        for definition in &definitions {
            for included in &definition.includes {
                graph.add_edge(definition.name, *included);
            }
        }

        for cycle in graph.detect_cycles() {
            let path: Vec<&str> = cycle.iter().map(|name| name.as_str()).collect();
            warn!("Permission inclusion cycle detected: {}", path.join(" -> "));
        }

        let entries = definitions
            .into_iter()
            .map(|definition| PermissionEntry {
                closure: graph.closure(definition.name),
                category: definition.category,
                description: definition.description,
            })
            .collect();

        debug!(
            "PermissionCatalog built: {} permissions, {} inclusion edges",
            PermissionName::ALL.len(),
            graph.edge_count()
        );

        Ok(Self {
            table: Arc::new(PermissionTable { entries, graph }),
        })
    }

    /// Resolve a permission by wire name
    ///
    /// # Errors
    ///
    /// Returns `InvalidPermission` if `name` is not a known permission.
    pub fn lookup(&self, name: &str) -> Result<Permission> {
        let name: PermissionName = name.parse()?;
        Ok(self.get(name))
    }

    /// Resolve a permission by typed name
    pub fn get(&self, name: PermissionName) -> Permission {
        Permission {
            name,
            table: Arc::clone(&self.table),
        }
    }

    /// Every permission in the catalog
    pub fn all(&self) -> PermissionSet {
        PermissionName::ALL.iter().map(|name| self.get(*name)).collect()
    }

    /// Every permission in `category`
    pub fn by_category(&self, category: PermissionCategory) -> PermissionSet {
        PermissionName::ALL
            .iter()
            .filter(|name| self.table.entry(**name).category == category)
            .map(|name| self.get(*name))
            .collect()
    }

    /// Categories that contain at least one permission
    pub fn categories(&self) -> BTreeSet<PermissionCategory> {
        self.table.entries.iter().map(|entry| entry.category).collect()
    }

    /// The seeds plus everything they transitively include
    pub fn expand<I>(&self, names: I) -> PermissionSet
    where
        I: IntoIterator<Item = PermissionName>,
    {
        self.table
            .graph
            .closure_of(names)
            .into_iter()
            .map(|name| self.get(name))
            .collect()
    }

    /// The inclusion graph backing this catalog
    pub fn graph(&self) -> &InclusionGraph {
        &self.table.graph
    }

    /// Cycles present in the inclusion graph (diagnostic only)
    pub fn detect_cycles(&self) -> Vec<Vec<PermissionName>> {
        self.table.graph.detect_cycles()
    }

    /// Whether two catalog handles share the same frozen table
    pub fn ptr_eq(&self, other: &PermissionCatalog) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
    }
}

/// A capability plus everything it implies
///
/// Identity is the permission name: equality, ordering and hashing ignore which
/// catalog the handle came from.
#[derive(Clone)]
pub struct Permission {
    name: PermissionName,
    table: Arc<PermissionTable>,
}

impl Permission {
    /// Resolve a permission from the built-in catalog
    ///
    /// # Errors
    ///
    /// Returns `InvalidPermission` if `name` is not a known permission.
    pub fn create(name: &str) -> Result<Self> {
        crate::config::builtin_catalog().permissions().lookup(name)
    }

    /// Every built-in permission in `category`
    pub fn create_for_category(category: PermissionCategory) -> PermissionSet {
        crate::config::builtin_catalog().permissions().by_category(category)
    }

    pub fn name(&self) -> PermissionName {
        self.name
    }

    pub fn category(&self) -> PermissionCategory {
        self.table.entry(self.name).category
    }

    pub fn description(&self) -> &str {
        &self.table.entry(self.name).description
    }

    /// Permissions declared as directly implied (no closure)
    pub fn direct_inclusions(&self) -> &[PermissionName] {
        self.table.graph.direct(self.name)
    }

    /// Names of every permission transitively implied by this one
    pub fn included_names(&self) -> &BTreeSet<PermissionName> {
        &self.table.entry(self.name).closure
    }

    /// Every permission transitively implied by this one
    pub fn included_permissions(&self) -> PermissionSet {
        self.included_names()
            .iter()
            .map(|name| Permission {
                name: *name,
                table: Arc::clone(&self.table),
            })
            .collect()
    }

    /// True if `other` is this permission or is transitively implied by it
    pub fn includes(&self, other: &Permission) -> bool {
        self.includes_name(other.name)
    }

    pub fn includes_name(&self, name: PermissionName) -> bool {
        self.name == name || self.included_names().contains(&name)
    }

    /// Whether both handles point at the same interned catalog entry
    pub fn ptr_eq(&self, other: &Permission) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.table, &other.table)
    }
}

impl fmt::Debug for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Permission").field(&self.name).finish()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name.as_str())
    }
}

impl PartialEq for Permission {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Permission {}

impl Hash for Permission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Permission {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Permission {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Borrow<PermissionName> for Permission {
    fn borrow(&self) -> &PermissionName {
        &self.name
    }
}

/// Set of permissions deduplicated by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    permissions: BTreeSet<Permission>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Membership by name
    pub fn contains(&self, name: PermissionName) -> bool {
        self.permissions.contains(&name)
    }

    pub fn get(&self, name: PermissionName) -> Option<&Permission> {
        self.permissions.get(&name)
    }

    /// True if some member equals or transitively includes `name`
    pub fn grants(&self, name: PermissionName) -> bool {
        self.contains(name) || self.permissions.iter().any(|p| p.includes_name(name))
    }

    /// Insert a permission; returns false if one with the same name was present
    pub fn insert(&mut self, permission: Permission) -> bool {
        self.permissions.insert(permission)
    }

    pub fn union(&self, other: &PermissionSet) -> PermissionSet {
        self.permissions
            .union(&other.permissions)
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Member names in enum order
    pub fn names(&self) -> impl Iterator<Item = PermissionName> + '_ {
        self.permissions.iter().map(Permission::name)
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl Extend<Permission> for PermissionSet {
    fn extend<I: IntoIterator<Item = Permission>>(&mut self, iter: I) {
        self.permissions.extend(iter);
    }
}

impl IntoIterator for PermissionSet {
    type Item = Permission;
    type IntoIter = std::collections::btree_set::IntoIter<Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.into_iter()
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::collections::btree_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.iter()
    }
}
