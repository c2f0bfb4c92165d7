//! Built-in environments shipped with the tooling.
//!
//! These are read-only: the resolver refuses any request whose name matches
//! one of them, compared case-insensitively.

use super::{EndpointKind, Endpoints, Environment, names_match};

pub const AZURE_CLOUD: &str = "AzureCloud";
pub const AZURE_CHINA_CLOUD: &str = "AzureChinaCloud";
pub const AZURE_US_GOVERNMENT: &str = "AzureUSGovernment";
pub const AZURE_GERMAN_CLOUD: &str = "AzureGermanCloud";

pub const BUILT_IN_NAMES: [&str; 4] = [
    AZURE_CLOUD,
    AZURE_CHINA_CLOUD,
    AZURE_US_GOVERNMENT,
    AZURE_GERMAN_CLOUD,
];

/// Returns the built-in name `name` collides with, using the built-in's spelling.
pub fn find_protected<'a, I>(built_in_names: I, name: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    built_in_names
        .into_iter()
        .find(|built_in| names_match(built_in, name))
}

pub fn is_protected<'a, I>(built_in_names: I, name: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    find_protected(built_in_names, name).is_some()
}

/// Looks up a built-in environment by name, case-insensitively.
pub fn get(name: &str) -> Option<Environment> {
    built_in_environments()
        .into_iter()
        .find(|env| env.is_named(name))
}

/// All built-in environments with their full endpoint sets.
pub fn built_in_environments() -> Vec<Environment> {
    vec![azure_cloud(), azure_china_cloud(), azure_us_government(), azure_german_cloud()]
}

fn build(name: &str, endpoints: &[(EndpointKind, &str)]) -> Environment {
    let endpoints: Endpoints = endpoints
        .iter()
        .map(|(kind, value)| (*kind, value.to_string()))
        .collect();
    Environment::with_endpoints(name, endpoints, false)
}

fn azure_cloud() -> Environment {
    use EndpointKind::*;
    build(
        AZURE_CLOUD,
        &[
            (PublishSettingsFileUrl, "https://go.microsoft.com/fwlink/?LinkID=301775"),
            (ServiceManagement, "https://management.core.windows.net/"),
            (ResourceManager, "https://management.azure.com/"),
            (ManagementPortalUrl, "https://go.microsoft.com/fwlink/?LinkId=254433"),
            (StorageEndpointSuffix, "core.windows.net"),
            (ActiveDirectory, "https://login.microsoftonline.com/"),
            (
                ActiveDirectoryServiceEndpointResourceId,
                "https://management.core.windows.net/",
            ),
            (Gallery, "https://gallery.azure.com/"),
            (Graph, "https://graph.windows.net/"),
            (AzureKeyVaultDnsSuffix, "vault.azure.net"),
            (AzureKeyVaultServiceEndpointResourceId, "https://vault.azure.net"),
            (TrafficManagerDnsSuffix, "trafficmanager.net"),
            (SqlDatabaseDnsSuffix, ".database.windows.net"),
            (
                AzureDataLakeAnalyticsCatalogAndJobEndpointSuffix,
                "azuredatalakeanalytics.net",
            ),
            (AzureDataLakeStoreFileSystemEndpointSuffix, "azuredatalakestore.net"),
            (AdTenant, "Common"),
            (GraphEndpointResourceId, "https://graph.windows.net/"),
        ],
    )
}

fn azure_china_cloud() -> Environment {
    use EndpointKind::*;
    build(
        AZURE_CHINA_CLOUD,
        &[
            (PublishSettingsFileUrl, "http://go.microsoft.com/fwlink/?LinkID=301776"),
            (ServiceManagement, "https://management.core.chinacloudapi.cn/"),
            (ResourceManager, "https://management.chinacloudapi.cn/"),
            (ManagementPortalUrl, "http://go.microsoft.com/fwlink/?LinkId=301902"),
            (StorageEndpointSuffix, "core.chinacloudapi.cn"),
            (ActiveDirectory, "https://login.chinacloudapi.cn/"),
            (
                ActiveDirectoryServiceEndpointResourceId,
                "https://management.core.chinacloudapi.cn/",
            ),
            (Gallery, "https://gallery.chinacloudapi.cn/"),
            (Graph, "https://graph.chinacloudapi.cn/"),
            (AzureKeyVaultDnsSuffix, "vault.azure.cn"),
            (AzureKeyVaultServiceEndpointResourceId, "https://vault.azure.cn"),
            (TrafficManagerDnsSuffix, "trafficmanager.cn"),
            (SqlDatabaseDnsSuffix, ".database.chinacloudapi.cn"),
            (AdTenant, "Common"),
            (GraphEndpointResourceId, "https://graph.chinacloudapi.cn/"),
        ],
    )
}

fn azure_us_government() -> Environment {
    use EndpointKind::*;
    build(
        AZURE_US_GOVERNMENT,
        &[
            (PublishSettingsFileUrl, "https://manage.windowsazure.us/publishsettings/index"),
            (ServiceManagement, "https://management.core.usgovcloudapi.net/"),
            (ResourceManager, "https://management.usgovcloudapi.net/"),
            (ManagementPortalUrl, "https://manage.windowsazure.us"),
            (StorageEndpointSuffix, "core.usgovcloudapi.net"),
            (ActiveDirectory, "https://login.microsoftonline.us/"),
            (
                ActiveDirectoryServiceEndpointResourceId,
                "https://management.core.usgovcloudapi.net/",
            ),
            (Gallery, "https://gallery.usgovcloudapi.net/"),
            (Graph, "https://graph.windows.net/"),
            (AzureKeyVaultDnsSuffix, "vault.usgovcloudapi.net"),
            (AzureKeyVaultServiceEndpointResourceId, "https://vault.usgovcloudapi.net"),
            (TrafficManagerDnsSuffix, "usgovtrafficmanager.net"),
            (SqlDatabaseDnsSuffix, ".database.usgovcloudapi.net"),
            (AdTenant, "Common"),
            (GraphEndpointResourceId, "https://graph.windows.net/"),
        ],
    )
}

fn azure_german_cloud() -> Environment {
    use EndpointKind::*;
    build(
        AZURE_GERMAN_CLOUD,
        &[
            (PublishSettingsFileUrl, "https://manage.microsoftazure.de/publishsettings/index"),
            (ServiceManagement, "https://management.core.cloudapi.de/"),
            (ResourceManager, "https://management.microsoftazure.de/"),
            (ManagementPortalUrl, "http://portal.microsoftazure.de/"),
            (StorageEndpointSuffix, "core.cloudapi.de"),
            (ActiveDirectory, "https://login.microsoftonline.de/"),
            (
                ActiveDirectoryServiceEndpointResourceId,
                "https://management.core.cloudapi.de/",
            ),
            (Gallery, "https://gallery.cloudapi.de/"),
            (Graph, "https://graph.cloudapi.de/"),
            (AzureKeyVaultDnsSuffix, "vault.microsoftazure.de"),
            (AzureKeyVaultServiceEndpointResourceId, "https://vault.microsoftazure.de"),
            (TrafficManagerDnsSuffix, "azuretrafficmanager.de"),
            (SqlDatabaseDnsSuffix, ".database.cloudapi.de"),
            (AdTenant, "Common"),
            (GraphEndpointResourceId, "https://graph.cloudapi.de/"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_protected_returns_built_in_spelling() {
        assert_eq!(find_protected(BUILT_IN_NAMES, "azurecloud"), Some(AZURE_CLOUD));
        assert_eq!(
            find_protected(BUILT_IN_NAMES, "AZUREUSGOVERNMENT"),
            Some(AZURE_US_GOVERNMENT)
        );
        assert_eq!(find_protected(BUILT_IN_NAMES, "MyStack"), None);
    }

    #[test]
    fn test_is_protected_requires_full_name_match() {
        assert!(is_protected(BUILT_IN_NAMES, "AzureChinaCloud"));
        assert!(!is_protected(BUILT_IN_NAMES, "AzureChina"));
        assert!(!is_protected(BUILT_IN_NAMES, "AzureCloud2"));
        assert!(!is_protected(BUILT_IN_NAMES, ""));
    }

    #[test]
    fn test_built_in_environments_match_names() {
        let names: Vec<String> = built_in_environments()
            .iter()
            .map(|env| env.name().to_string())
            .collect();
        assert_eq!(names, BUILT_IN_NAMES);
    }

    #[test]
    fn test_public_cloud_endpoints() {
        let env = get("azurecloud").unwrap();
        assert_eq!(env.name(), AZURE_CLOUD);
        assert!(!env.on_premise());
        assert_eq!(
            env.endpoint(EndpointKind::ResourceManager),
            Some("https://management.azure.com/")
        );
        assert_eq!(
            env.endpoint(EndpointKind::AzureKeyVaultDnsSuffix),
            Some("vault.azure.net")
        );
        assert_eq!(env.endpoints().len(), EndpointKind::ALL.len());
    }

    #[test]
    fn test_sovereign_clouds_have_no_data_lake_endpoints() {
        for name in [AZURE_CHINA_CLOUD, AZURE_US_GOVERNMENT, AZURE_GERMAN_CLOUD] {
            let env = get(name).unwrap();
            assert!(
                !env.endpoints()
                    .contains(EndpointKind::AzureDataLakeStoreFileSystemEndpointSuffix)
            );
            assert!(env.endpoints().contains(EndpointKind::ActiveDirectory));
        }
    }
}
