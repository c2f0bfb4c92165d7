use engine::discovery::{DiscoveryResult, is_adfs_login, normalize_login_endpoint};
use engine::environment::{EndpointKind, Environment};
use engine::resolver::{EndpointOverrides, apply_overrides, overrides_from_discovery};
use proptest::prelude::*;

fn discovered(domain: String) -> DiscoveryResult {
    DiscoveryResult {
        login_endpoint: "https://login/".to_string(),
        audiences: vec!["urn:resource".to_string()],
        portal_endpoint: format!("https://portal.{domain}/"),
        gallery_endpoint: "https://gallery/".to_string(),
        graph_endpoint: "https://graph/".to_string(),
        resource_manager_endpoint: "https://management/".to_string(),
        domain,
        on_premise: false,
    }
}

fn any_kind() -> impl Strategy<Value = EndpointKind> {
    prop::sample::select(EndpointKind::ALL.to_vec())
}

#[cfg(test)]
mod normalization_properties {
    use super::*;

    proptest! {
        #[test]
        fn test_login_normalization_is_idempotent(login in "[a-zA-Z0-9:/._-]{0,40}") {
            let once = normalize_login_endpoint(&login);
            let twice = normalize_login_endpoint(&once);

            // Property: applying twice changes nothing
            prop_assert_eq!(&once, &twice);
            // Property: exactly one trailing slash
            prop_assert!(once.ends_with('/'));
            prop_assert!(!once.ends_with("//"));
        }

        #[test]
        fn test_adfs_classification_ignores_trailing_slashes(
            host in "[a-z]{1,12}\\.[a-z]{2,6}",
            slashes in 0usize..4
        ) {
            let login = format!("https://{host}/adfs{}", "/".repeat(slashes));
            prop_assert!(is_adfs_login(&login));
            prop_assert!(is_adfs_login(&normalize_login_endpoint(&login)));
        }
    }
}

#[cfg(test)]
mod derivation_properties {
    use super::*;

    proptest! {
        #[test]
        fn test_key_vault_values_are_lower_case_templates(
            domain in "[a-zA-Z0-9-]{1,12}(\\.[a-zA-Z0-9-]{1,12}){0,3}"
        ) {
            let overrides = overrides_from_discovery(&discovered(domain.clone()));
            let values: Vec<(EndpointKind, Option<&str>)> = overrides.iter().collect();

            let suffix = format!("vault.{}", domain.to_lowercase());
            let resource = format!("https://vault.{}", domain.to_lowercase());

            prop_assert!(values.contains(&(
                EndpointKind::AzureKeyVaultDnsSuffix,
                Some(suffix.as_str())
            )));
            prop_assert!(values.contains(&(
                EndpointKind::AzureKeyVaultServiceEndpointResourceId,
                Some(resource.as_str())
            )));
        }
    }
}

#[cfg(test)]
mod merge_properties {
    use super::*;

    proptest! {
        #[test]
        fn test_overlay_never_clears_and_is_idempotent(
            stored in prop::collection::vec((any_kind(), "[a-z]{1,8}"), 0..10),
            incoming in prop::collection::vec((any_kind(), prop::option::of("[a-z]{0,8}")), 0..10)
        ) {
            let mut base = Environment::new("Custom");
            for (kind, value) in &stored {
                base.endpoints_mut().set_if_provided(*kind, Some(value));
            }
            let overrides: EndpointOverrides = incoming.iter().cloned().collect();

            let mut once = base.clone();
            apply_overrides(&mut once, &overrides);
            let mut twice = once.clone();
            apply_overrides(&mut twice, &overrides);

            // Property: applying the same overrides again is a no-op
            prop_assert_eq!(&once, &twice);

            // Property: every stored kind is still configured
            for (kind, _) in &stored {
                prop_assert!(once.endpoints().contains(*kind));
            }

            // Property: kinds only touched by absent/empty values keep their value
            for (kind, value) in base.endpoints().iter() {
                let written = incoming
                    .iter()
                    .any(|(k, v)| k == &kind && v.as_deref().is_some_and(|v| !v.is_empty()));
                if !written {
                    prop_assert_eq!(once.endpoint(kind), Some(value));
                }
            }
        }
    }
}
