//! Environment data model.
//!
//! An [`Environment`] is a named set of service endpoints plus the
//! authentication mode flag. Endpoints are keyed by [`EndpointKind`] and kept
//! in the kind's declaration order so every rendering is stable.

pub mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Addressable service roles of a cloud environment.
///
/// Declaration order is the canonical order: iteration, serialization and
/// [`Environment::describe`] all follow it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EndpointKind {
    PublishSettingsFileUrl,
    ServiceManagement,
    ResourceManager,
    ManagementPortalUrl,
    StorageEndpointSuffix,
    ActiveDirectory,
    ActiveDirectoryServiceEndpointResourceId,
    Gallery,
    Graph,
    AzureKeyVaultDnsSuffix,
    AzureKeyVaultServiceEndpointResourceId,
    TrafficManagerDnsSuffix,
    SqlDatabaseDnsSuffix,
    AzureDataLakeAnalyticsCatalogAndJobEndpointSuffix,
    AzureDataLakeStoreFileSystemEndpointSuffix,
    AdTenant,
    GraphEndpointResourceId,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 17] = [
        EndpointKind::PublishSettingsFileUrl,
        EndpointKind::ServiceManagement,
        EndpointKind::ResourceManager,
        EndpointKind::ManagementPortalUrl,
        EndpointKind::StorageEndpointSuffix,
        EndpointKind::ActiveDirectory,
        EndpointKind::ActiveDirectoryServiceEndpointResourceId,
        EndpointKind::Gallery,
        EndpointKind::Graph,
        EndpointKind::AzureKeyVaultDnsSuffix,
        EndpointKind::AzureKeyVaultServiceEndpointResourceId,
        EndpointKind::TrafficManagerDnsSuffix,
        EndpointKind::SqlDatabaseDnsSuffix,
        EndpointKind::AzureDataLakeAnalyticsCatalogAndJobEndpointSuffix,
        EndpointKind::AzureDataLakeStoreFileSystemEndpointSuffix,
        EndpointKind::AdTenant,
        EndpointKind::GraphEndpointResourceId,
    ];

    /// Canonical name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::PublishSettingsFileUrl => "PublishSettingsFileUrl",
            EndpointKind::ServiceManagement => "ServiceManagement",
            EndpointKind::ResourceManager => "ResourceManager",
            EndpointKind::ManagementPortalUrl => "ManagementPortalUrl",
            EndpointKind::StorageEndpointSuffix => "StorageEndpointSuffix",
            EndpointKind::ActiveDirectory => "ActiveDirectory",
            EndpointKind::ActiveDirectoryServiceEndpointResourceId => {
                "ActiveDirectoryServiceEndpointResourceId"
            }
            EndpointKind::Gallery => "Gallery",
            EndpointKind::Graph => "Graph",
            EndpointKind::AzureKeyVaultDnsSuffix => "AzureKeyVaultDnsSuffix",
            EndpointKind::AzureKeyVaultServiceEndpointResourceId => {
                "AzureKeyVaultServiceEndpointResourceId"
            }
            EndpointKind::TrafficManagerDnsSuffix => "TrafficManagerDnsSuffix",
            EndpointKind::SqlDatabaseDnsSuffix => "SqlDatabaseDnsSuffix",
            EndpointKind::AzureDataLakeAnalyticsCatalogAndJobEndpointSuffix => {
                "AzureDataLakeAnalyticsCatalogAndJobEndpointSuffix"
            }
            EndpointKind::AzureDataLakeStoreFileSystemEndpointSuffix => {
                "AzureDataLakeStoreFileSystemEndpointSuffix"
            }
            EndpointKind::AdTenant => "AdTenant",
            EndpointKind::GraphEndpointResourceId => "GraphEndpointResourceId",
        }
    }

    /// Alternative spellings accepted by [`FromStr`] besides the canonical name.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            EndpointKind::ServiceManagement => &["ServiceEndpoint", "ServiceManagementUrl"],
            EndpointKind::ResourceManager => {
                &["ResourceManagerEndpoint", "ResourceManagerUrl", "ArmUrl"]
            }
            EndpointKind::StorageEndpointSuffix => &["StorageEndpoint"],
            EndpointKind::ActiveDirectory => &[
                "ActiveDirectoryEndpoint",
                "AdEndpointUrl",
                "ActiveDirectoryAuthority",
            ],
            EndpointKind::Gallery => &["GalleryEndpoint", "GalleryUrl"],
            EndpointKind::Graph => &["GraphEndpoint", "GraphUrl"],
            EndpointKind::GraphEndpointResourceId => &["GraphAudience", "GraphResourceId"],
            _ => &[],
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown endpoint kind: {0}")]
pub struct UnknownEndpointKind(pub String);

impl FromStr for EndpointKind {
    type Err = UnknownEndpointKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EndpointKind::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str().eq_ignore_ascii_case(wanted)
                    || kind
                        .aliases()
                        .iter()
                        .any(|alias| alias.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| UnknownEndpointKind(s.to_string()))
    }
}

/// Ordered endpoint map of one environment.
///
/// A kind that is not present is "not configured". Values written through
/// [`Endpoints::set_if_provided`] are never empty; an empty string can only
/// come from a deserialized profile and is kept as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoints(BTreeMap<EndpointKind, String>);

impl Endpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: EndpointKind) -> Option<&str> {
        self.0.get(&kind).map(String::as_str)
    }

    pub fn contains(&self, kind: EndpointKind) -> bool {
        self.0.contains_key(&kind)
    }

    /// Writes `value` when it is present and non-empty.
    ///
    /// Returns `true` when the map was written. Absent or empty values leave
    /// the current entry untouched; this is the only write path the merge uses.
    pub fn set_if_provided(&mut self, kind: EndpointKind, value: Option<&str>) -> bool {
        match value {
            Some(value) if !value.is_empty() => {
                self.0.insert(kind, value.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EndpointKind, &str)> {
        self.0.iter().map(|(kind, value)| (*kind, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(EndpointKind, String)> for Endpoints {
    fn from_iter<I: IntoIterator<Item = (EndpointKind, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Case-insensitive name identity shared by the registry and every store.
///
/// Folds with Unicode lowercase, so `CAFÉ` and `café` name the same environment.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

pub fn names_match(left: &str, right: &str) -> bool {
    left == right || name_key(left) == name_key(right)
}

/// A named cloud environment.
///
/// The name is fixed at construction; comparisons against other names are
/// case-insensitive (see [`Environment::is_named`]).
///
/// # Examples
///
/// ```no_run
/// use engine::environment::{EndpointKind, Environment};
///
/// let mut env = Environment::new("MyStack");
/// env.endpoints_mut()
///     .set_if_provided(EndpointKind::ResourceManager, Some("https://management.mystack.local/"));
/// env.set_on_premise(true);
///
/// assert!(env.is_named("mystack"));
/// print!("{}", env.describe());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    name: String,
    #[serde(default)]
    endpoints: Endpoints,
    #[serde(default)]
    on_premise: bool,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoints: Endpoints::new(),
            on_premise: false,
        }
    }

    pub fn with_endpoints(name: impl Into<String>, endpoints: Endpoints, on_premise: bool) -> Self {
        Self {
            name: name.into(),
            endpoints,
            on_premise,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn endpoints_mut(&mut self) -> &mut Endpoints {
        &mut self.endpoints
    }

    pub fn endpoint(&self, kind: EndpointKind) -> Option<&str> {
        self.endpoints.get(kind)
    }

    /// `true` when the environment authenticates through ADFS instead of AAD.
    pub fn on_premise(&self) -> bool {
        self.on_premise
    }

    pub fn set_on_premise(&mut self, on_premise: bool) {
        self.on_premise = on_premise;
    }

    /// Renders one `Kind : value` line per configured endpoint.
    pub fn describe(&self) -> String {
        self.endpoints
            .iter()
            .map(|(kind, value)| format!("{kind} : {value}\n"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_kind_parses_canonical_names_case_insensitively() {
        for kind in EndpointKind::ALL {
            assert_eq!(kind.as_str().parse::<EndpointKind>().unwrap(), kind);
            assert_eq!(
                kind.as_str().to_lowercase().parse::<EndpointKind>().unwrap(),
                kind
            );
        }
    }

    #[test]
    fn test_endpoint_kind_parses_aliases() {
        assert_eq!(
            "ArmUrl".parse::<EndpointKind>().unwrap(),
            EndpointKind::ResourceManager
        );
        assert_eq!(
            "activedirectoryauthority".parse::<EndpointKind>().unwrap(),
            EndpointKind::ActiveDirectory
        );
        assert_eq!(
            "GraphAudience".parse::<EndpointKind>().unwrap(),
            EndpointKind::GraphEndpointResourceId
        );
        assert_eq!(
            "StorageEndpoint".parse::<EndpointKind>().unwrap(),
            EndpointKind::StorageEndpointSuffix
        );
    }

    #[test]
    fn test_endpoint_kind_rejects_unknown_names() {
        let err = "Blob".parse::<EndpointKind>().unwrap_err();
        assert_eq!(err, UnknownEndpointKind("Blob".to_string()));
        assert!(err.to_string().contains("Blob"));
    }

    #[test]
    fn test_set_if_provided_ignores_absent_and_empty_values() {
        let mut endpoints = Endpoints::new();
        assert!(endpoints.set_if_provided(EndpointKind::Gallery, Some("https://gallery/")));
        assert!(!endpoints.set_if_provided(EndpointKind::Gallery, Some("")));
        assert!(!endpoints.set_if_provided(EndpointKind::Gallery, None));
        assert_eq!(endpoints.get(EndpointKind::Gallery), Some("https://gallery/"));
        assert!(!endpoints.contains(EndpointKind::Graph));
    }

    #[test]
    fn test_describe_follows_canonical_order() {
        let mut env = Environment::new("Custom");
        env.endpoints_mut()
            .set_if_provided(EndpointKind::Graph, Some("https://graph/"));
        env.endpoints_mut()
            .set_if_provided(EndpointKind::ResourceManager, Some("https://arm/"));

        assert_eq!(
            env.describe(),
            "ResourceManager : https://arm/\nGraph : https://graph/\n"
        );
    }

    #[test]
    fn test_environment_serializes_with_canonical_keys() {
        let mut env = Environment::new("Custom");
        env.endpoints_mut()
            .set_if_provided(EndpointKind::AdTenant, Some("Common"));
        env.set_on_premise(true);

        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["name"], "Custom");
        assert_eq!(json["onPremise"], true);
        assert_eq!(json["endpoints"]["AdTenant"], "Common");

        let back: Environment = serde_json::from_value(json).unwrap();
        assert_eq!(back, env);
    }

    #[test]
    fn test_deserialized_empty_value_is_kept_distinct_from_absent() {
        let env: Environment = serde_json::from_str(
            r#"{"name":"Custom","endpoints":{"Gallery":""}}"#,
        )
        .unwrap();
        assert_eq!(env.endpoint(EndpointKind::Gallery), Some(""));
        assert_eq!(env.endpoint(EndpointKind::Graph), None);
        assert!(!env.on_premise());
    }

    #[test]
    fn test_is_named_folds_non_ascii_case() {
        let env = Environment::new("CAFÉ");

        assert!(env.is_named("café"));
        assert!(env.is_named("Café"));
        assert!(!env.is_named("cafe"));
        assert_eq!(name_key("CAFÉ"), name_key("café"));
    }
}
