//! Memoizing authorization resolver
//!
//! Sessions with the same role and the same custom grants share one effective
//! permission set. The resolver keys a `DashMap` on the resolved role plus the
//! sorted, deduplicated valid custom grants, so concurrent request handlers can
//! share it through an `Arc` without external locking.
//!
//! Catalogs never change after startup, so entries never go stale and there is no
//! TTL. Once `max_entries` is reached new results are still computed but no longer
//! stored.
//!
//! # Example
//!
//! ```rust
//! use teamfit_authz::{builtin_catalog, AuthorizationResolver, PermissionName};
//!
//! let resolver = AuthorizationResolver::new(builtin_catalog().clone());
//!
//! let auth = resolver.resolve("user", &["manage_content"]);
//! assert!(auth.has_permission(PermissionName::EditContent));
//!
//! let again = resolver.resolve("user", &["manage_content"]);
//! assert_eq!(again.permission_objects(), auth.permission_objects());
//! assert_eq!(resolver.cache_stats().hits, 1);
//! ```

use crate::permission::{PermissionName, PermissionSet};
use crate::principal::PrincipalAuthorization;
use crate::role::{RoleCatalog, RoleName};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Default maximum number of memoized effective sets
const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Cache key for effective-set memoization
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    role: RoleName,
    /// Sorted, deduplicated valid custom grants
    custom: Vec<PermissionName>,
}

impl CacheKey {
    fn new(role: RoleName, custom: &[PermissionName]) -> Self {
        let mut custom = custom.to_vec();
        custom.sort();
        custom.dedup();
        Self { role, custom }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Requests answered from the memo
    pub hits: usize,
    /// Requests that had to compute the effective set
    pub misses: usize,
    /// Current number of memoized sets
    pub entries: usize,
    /// Maximum number of memoized sets
    pub max_entries: usize,
}

impl CacheStats {
    /// Fraction of requests answered from the memo
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Builds [`PrincipalAuthorization`]s that share memoized effective sets
pub struct AuthorizationResolver {
    catalog: RoleCatalog,
    cache: DashMap<CacheKey, Arc<PermissionSet>>,
    max_entries: usize,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl AuthorizationResolver {
    /// Create a resolver with the default capacity (10,000 entries)
    pub fn new(catalog: RoleCatalog) -> Self {
        Self::with_capacity(catalog, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(catalog: RoleCatalog, max_entries: usize) -> Self {
        Self {
            catalog,
            cache: DashMap::new(),
            max_entries,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Resolve a session's authorization
    ///
    /// Same fallback and leniency rules as [`PrincipalAuthorization::from_catalog`].
    pub fn resolve<S: AsRef<str>>(
        &self,
        role_name: &str,
        custom_permissions: &[S],
    ) -> PrincipalAuthorization {
        let principal =
            PrincipalAuthorization::from_catalog(&self.catalog, role_name, custom_permissions);
        let key = CacheKey::new(principal.role().name(), principal.valid_custom_permissions());

        if let Some(cached) = self.cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            let effective = Arc::clone(cached.value());
            drop(cached);
            return principal.with_effective(effective);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let effective = Arc::clone(principal.shared_permission_objects());

        if self.cache.len() < self.max_entries {
            debug!(
                "Memoizing effective set for role {} with {} custom grants",
                key.role,
                key.custom.len()
            );
            self.cache.insert(key, effective);
        }

        principal
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.len(),
            max_entries: self.max_entries,
        }
    }

    /// Drop all memoized sets and reset counters
    pub fn clear(&self) {
        self.cache.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
