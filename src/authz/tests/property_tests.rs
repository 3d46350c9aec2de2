//! Property-based tests for closure and composition invariants

use proptest::prelude::*;
use teamfit_authz::{
    builtin_catalog, CatalogConfig, PermissionName, PrincipalAuthorization, RoleName,
};

fn permission_name() -> impl Strategy<Value = PermissionName> {
    proptest::sample::select(PermissionName::ALL.to_vec())
}

fn role_name() -> impl Strategy<Value = RoleName> {
    proptest::sample::select(RoleName::ALL.to_vec())
}

fn custom_grants() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            permission_name().prop_map(|name| name.as_str().to_string()),
            "[a-z_]{0,12}",
        ],
        0..6,
    )
}

proptest! {
    #[test]
    fn test_inclusion_is_transitive(a in permission_name(), b in permission_name(), c in permission_name()) {
        let catalog = builtin_catalog().permissions();
        let (a, b, c) = (catalog.get(a), catalog.get(b), catalog.get(c));

        if a.includes(&b) && b.includes(&c) {
            prop_assert!(a.includes(&c));
        }
    }

    #[test]
    fn test_role_grants_closure_of_declared(role in role_name()) {
        let role = builtin_catalog().get(role);

        for declared in role.permissions() {
            let permission = builtin_catalog().permissions().get(*declared);
            for included in permission.included_names() {
                prop_assert!(role.has_permission(*included));
            }
        }
    }

    #[test]
    fn test_custom_grants_are_monotone(role in role_name(), custom in custom_grants(), extra in permission_name()) {
        let base = PrincipalAuthorization::create(role.as_str(), &custom);

        let mut extended_custom = custom.clone();
        extended_custom.push(extra.as_str().to_string());
        let extended = PrincipalAuthorization::create(role.as_str(), &extended_custom);

        for permission in base.permission_objects() {
            prop_assert!(extended.has_permission(permission.name()));
        }
        prop_assert!(extended.has_permission(extra));
    }

    #[test]
    fn test_create_never_fails(role in "[a-z_]{0,16}", custom in custom_grants()) {
        let auth = PrincipalAuthorization::create(&role, &custom);

        prop_assert!(!auth.permission_objects().is_empty());
        prop_assert_eq!(auth.custom_permissions().len(), custom.len());
    }

    #[test]
    fn test_random_cycles_terminate(edges in prop::collection::vec((permission_name(), permission_name()), 0..60)) {
        let mut config = CatalogConfig::builtin();
        for (from, to) in &edges {
            if let Some(definition) = config.permissions.iter_mut().find(|d| d.name == *from) {
                definition.includes.push(*to);
            }
        }

        let catalog = config.build().unwrap();
        for (from, to) in &edges {
            prop_assert!(catalog.permissions().get(*from).includes_name(*to));
        }
    }
}
