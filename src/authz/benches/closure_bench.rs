//! Benchmarks for permission resolution
//!
//! Measures performance of:
//! - Catalog construction (closure computation)
//! - Principal construction and first query
//! - Memoized resolution
//! - Permission checks on a warm principal

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use teamfit_authz::{
    builtin_catalog, AuthorizationResolver, CatalogConfig, PermissionName, PrincipalAuthorization,
};

fn bench_catalog_build(c: &mut Criterion) {
    c.bench_function("catalog_build", |b| {
        b.iter(|| CatalogConfig::builtin().build().unwrap())
    });
}

fn bench_principal(c: &mut Criterion) {
    let mut group = c.benchmark_group("principal");

    let cases: Vec<(&str, &str, Vec<&str>)> = vec![
        ("guest_plain", "guest", vec![]),
        ("user_custom", "user", vec!["manage_content", "view_analytics"]),
        ("super_admin", "super_admin", vec![]),
    ];

    for (name, role, custom) in &cases {
        group.bench_function(*name, |b| {
            b.iter(|| {
                let auth = PrincipalAuthorization::create(black_box(*role), custom.as_slice());
                auth.has_permission(PermissionName::ManageUsers)
            });
        });
    }

    group.finish();
}

fn bench_resolver(c: &mut Criterion) {
    let resolver = AuthorizationResolver::new(builtin_catalog().clone());
    resolver.resolve("user", &["manage_content"]);

    c.bench_function("resolver_hit", |b| {
        b.iter(|| {
            let auth = resolver.resolve(black_box("user"), &["manage_content"]);
            auth.has_permission(PermissionName::EditContent)
        });
    });
}

fn bench_checks(c: &mut Criterion) {
    let auth = PrincipalAuthorization::create("manager", &["view_audit_log"]);
    auth.permission_objects();

    c.bench_function("has_all_permissions", |b| {
        b.iter(|| {
            auth.has_all_permissions(black_box(&[
                PermissionName::ManageTeams,
                PermissionName::ViewContent,
                PermissionName::ViewAuditLog,
            ]))
        });
    });
}

criterion_group!(benches, bench_catalog_build, bench_principal, bench_resolver, bench_checks);
criterion_main!(benches);
