//! # Authorization Catalog Inspector
//!
//! Loads a catalog, validates it, and prints what it grants.
//!
//! ## Usage
//!
//! ```text
//! authz-catalog                      # summary of every role
//! authz-catalog user manage_content  # effective permissions of one session
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `AUTHZ_CATALOG` - Path to a JSON catalog (default: built-in catalog)
//! - `RUST_LOG` - Log level (default: info)

use anyhow::Context;
use teamfit_authz::{CatalogConfig, PrincipalAuthorization, RoleCatalog};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn load_catalog() -> anyhow::Result<RoleCatalog> {
    let config = match std::env::var("AUTHZ_CATALOG") {
        Ok(path) => {
            info!("Loading catalog from {}", path);
            CatalogConfig::from_path(&path)
                .with_context(|| format!("failed to read catalog {}", path))?
        }
        Err(_) => CatalogConfig::builtin(),
    };

    config.build().context("catalog validation failed")
}

fn print_roles(catalog: &RoleCatalog) {
    println!("{:<18} {:>8} {:>8} {:>9}  system", "role", "priority", "declared", "effective");
    for role in catalog.roles_by_priority() {
        println!(
            "{:<18} {:>8} {:>8} {:>9}  {}",
            role.name(),
            role.priority(),
            role.permissions().len(),
            role.permission_objects().len(),
            if role.is_system_role() { "yes" } else { "no" }
        );
    }
}

fn print_principal(catalog: &RoleCatalog, role: &str, grants: &[String]) {
    let auth = PrincipalAuthorization::from_catalog(catalog, role, grants);

    println!("{}", auth);
    for permission in auth.permission_objects() {
        println!("  {:<22} {:<12} {}", permission.name(), permission.category(), permission.description());
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("TeamFit authorization catalog inspector v{}", teamfit_authz::VERSION);

    let catalog = load_catalog()?;

    let cycles = catalog.permissions().detect_cycles();
    if !cycles.is_empty() {
        warn!("Catalog contains {} inclusion cycle(s)", cycles.len());
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first() {
        Some((role, grants)) => print_principal(&catalog, role, grants),
        None => print_roles(&catalog),
    }

    Ok(())
}
