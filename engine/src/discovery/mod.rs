//! Metadata discovery.
//!
//! Given the Azure Resource Manager root of a deployment, fetches the
//! deployment's metadata document and turns it into a [`DiscoveryResult`]
//! the resolver can overlay onto an environment.

pub mod client;
pub mod types;

pub use client::MetadataClient;
pub use types::{
    AuthenticationMetadata, DiscoveryResult, MetadataDocument, is_adfs_login,
    normalize_login_endpoint, retrieve_domain,
};

use crate::common::errors::DiscoveryError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_VERSION: &str = "1.0";

/// Source of deployment metadata.
///
/// The production implementation is [`MetadataClient`]; the resolver only
/// depends on this trait so callers can swap in another transport.
///
/// # Examples
///
/// ```no_run
/// use async_trait::async_trait;
/// use engine::common::errors::DiscoveryError;
/// use engine::discovery::{DiscoveryResult, MetadataSource};
///
/// struct Offline;
///
/// #[async_trait]
/// impl MetadataSource for Offline {
///     async fn discover(&self, endpoint: &str) -> Result<DiscoveryResult, DiscoveryError> {
///         Err(DiscoveryError::RequestFailed {
///             url: endpoint.to_string(),
///             reason: "offline".to_string(),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetches and parses the metadata document under `resource_manager_endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] for transport failures, non-success statuses
    /// and malformed or incomplete documents. No partial result is returned.
    async fn discover(
        &self,
        resource_manager_endpoint: &str,
    ) -> Result<DiscoveryResult, DiscoveryError>;
}

/// Discovery settings, deserialized from the `[discovery]` config section.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DiscoveryConfig {
    /// Request timeout in seconds (default: 30)
    timeout_secs: Option<u64>,
    /// api-version query parameter of the metadata request (default: "1.0")
    api_version: Option<String>,
}

impl DiscoveryConfig {
    pub fn new(timeout_secs: u64, api_version: impl Into<String>) -> Self {
        Self {
            timeout_secs: Some(timeout_secs),
            api_version: Some(api_version.into()),
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs())
    }

    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }
}
