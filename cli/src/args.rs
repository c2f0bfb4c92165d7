use clap::{Args, Parser, Subcommand};
use engine::environment::EndpointKind;
use engine::resolver::{EndpointOverrides, EnvironmentRequest};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cloudenv")]
#[command(about = "Manage named cloud environments and their service endpoints", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ./config.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Environments profile file (default: user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub profile: Option<PathBuf>,

    /// Print environments as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or update a custom environment
    Set(SetArgs),

    /// Show one environment, built-in or custom
    Get {
        /// Environment name (case-insensitive)
        name: String,
    },

    /// List built-in and custom environments
    List,
}

/// Arguments of `cloudenv set`.
///
/// Either explicit endpoint values or `--arm-endpoint` for discovery; clap
/// rejects a mix of both.
#[derive(Args, Debug, Default)]
pub struct SetArgs {
    /// Environment name (case-insensitive)
    pub name: String,

    /// Discover all endpoints from this Azure Resource Manager root
    #[arg(long, value_name = "URL", visible_alias = "arm-url")]
    pub arm_endpoint: Option<String>,

    #[arg(long, value_name = "URL", conflicts_with = "arm_endpoint")]
    pub publish_settings_file_url: Option<String>,

    #[arg(
        long,
        value_name = "URL",
        visible_alias = "service-management-url",
        conflicts_with = "arm_endpoint"
    )]
    pub service_endpoint: Option<String>,

    #[arg(
        long,
        value_name = "URL",
        visible_alias = "resource-manager-url",
        conflicts_with = "arm_endpoint"
    )]
    pub resource_manager_endpoint: Option<String>,

    #[arg(long, value_name = "URL", conflicts_with = "arm_endpoint")]
    pub management_portal_url: Option<String>,

    /// Storage endpoint suffix, e.g. core.windows.net
    #[arg(
        long,
        value_name = "SUFFIX",
        visible_alias = "storage-endpoint-suffix",
        conflicts_with = "arm_endpoint"
    )]
    pub storage_endpoint: Option<String>,

    #[arg(
        long,
        value_name = "URL",
        visible_aliases = ["ad-endpoint-url", "active-directory-authority"],
        conflicts_with = "arm_endpoint"
    )]
    pub active_directory_endpoint: Option<String>,

    #[arg(long, value_name = "ID", conflicts_with = "arm_endpoint")]
    pub active_directory_service_endpoint_resource_id: Option<String>,

    #[arg(
        long,
        value_name = "URL",
        visible_alias = "gallery-url",
        conflicts_with = "arm_endpoint"
    )]
    pub gallery_endpoint: Option<String>,

    #[arg(
        long,
        value_name = "URL",
        visible_alias = "graph-url",
        conflicts_with = "arm_endpoint"
    )]
    pub graph_endpoint: Option<String>,

    #[arg(long, value_name = "SUFFIX", conflicts_with = "arm_endpoint")]
    pub azure_key_vault_dns_suffix: Option<String>,

    #[arg(long, value_name = "ID", conflicts_with = "arm_endpoint")]
    pub azure_key_vault_service_endpoint_resource_id: Option<String>,

    #[arg(long, value_name = "SUFFIX", conflicts_with = "arm_endpoint")]
    pub traffic_manager_dns_suffix: Option<String>,

    #[arg(long, value_name = "SUFFIX", conflicts_with = "arm_endpoint")]
    pub sql_database_dns_suffix: Option<String>,

    #[arg(long, value_name = "SUFFIX", conflicts_with = "arm_endpoint")]
    pub azure_data_lake_analytics_catalog_and_job_endpoint_suffix: Option<String>,

    #[arg(long, value_name = "SUFFIX", conflicts_with = "arm_endpoint")]
    pub azure_data_lake_store_file_system_endpoint_suffix: Option<String>,

    #[arg(long, value_name = "TENANT", conflicts_with = "arm_endpoint")]
    pub ad_tenant: Option<String>,

    #[arg(
        long,
        value_name = "ID",
        visible_alias = "graph-endpoint-resource-id",
        conflicts_with = "arm_endpoint"
    )]
    pub graph_audience: Option<String>,

    /// Authenticate through ADFS instead of Azure Active Directory
    #[arg(
        long,
        visible_alias = "enable-adfs-authentication",
        conflicts_with = "arm_endpoint"
    )]
    pub on_premise: bool,

    /// Show the resulting endpoints without saving them
    #[arg(long)]
    pub what_if: bool,
}

impl SetArgs {
    /// Explicit endpoint values in canonical kind order.
    pub fn endpoint_values(&self) -> [(EndpointKind, Option<&str>); 17] {
        [
            (
                EndpointKind::PublishSettingsFileUrl,
                self.publish_settings_file_url.as_deref(),
            ),
            (
                EndpointKind::ServiceManagement,
                self.service_endpoint.as_deref(),
            ),
            (
                EndpointKind::ResourceManager,
                self.resource_manager_endpoint.as_deref(),
            ),
            (
                EndpointKind::ManagementPortalUrl,
                self.management_portal_url.as_deref(),
            ),
            (
                EndpointKind::StorageEndpointSuffix,
                self.storage_endpoint.as_deref(),
            ),
            (
                EndpointKind::ActiveDirectory,
                self.active_directory_endpoint.as_deref(),
            ),
            (
                EndpointKind::ActiveDirectoryServiceEndpointResourceId,
                self.active_directory_service_endpoint_resource_id.as_deref(),
            ),
            (EndpointKind::Gallery, self.gallery_endpoint.as_deref()),
            (EndpointKind::Graph, self.graph_endpoint.as_deref()),
            (
                EndpointKind::AzureKeyVaultDnsSuffix,
                self.azure_key_vault_dns_suffix.as_deref(),
            ),
            (
                EndpointKind::AzureKeyVaultServiceEndpointResourceId,
                self.azure_key_vault_service_endpoint_resource_id.as_deref(),
            ),
            (
                EndpointKind::TrafficManagerDnsSuffix,
                self.traffic_manager_dns_suffix.as_deref(),
            ),
            (
                EndpointKind::SqlDatabaseDnsSuffix,
                self.sql_database_dns_suffix.as_deref(),
            ),
            (
                EndpointKind::AzureDataLakeAnalyticsCatalogAndJobEndpointSuffix,
                self.azure_data_lake_analytics_catalog_and_job_endpoint_suffix
                    .as_deref(),
            ),
            (
                EndpointKind::AzureDataLakeStoreFileSystemEndpointSuffix,
                self.azure_data_lake_store_file_system_endpoint_suffix
                    .as_deref(),
            ),
            (EndpointKind::AdTenant, self.ad_tenant.as_deref()),
            (
                EndpointKind::GraphEndpointResourceId,
                self.graph_audience.as_deref(),
            ),
        ]
    }

    pub fn to_request(&self) -> EnvironmentRequest {
        match &self.arm_endpoint {
            Some(arm_endpoint) => EnvironmentRequest::discovery(&self.name, arm_endpoint),
            None => {
                let overrides: EndpointOverrides = self
                    .endpoint_values()
                    .into_iter()
                    .map(|(kind, value)| (kind, value.map(str::to_string)))
                    .collect();
                EnvironmentRequest::explicit(&self.name, overrides, self.on_premise)
            }
        }
    }
}
