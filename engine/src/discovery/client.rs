use super::types::{DiscoveryResult, MetadataDocument};
use super::{DiscoveryConfig, MetadataSource};
use crate::common::errors::DiscoveryError;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::ACCEPT;

const METADATA_PATH: &str = "metadata/endpoints";

/// reqwest-backed [`MetadataSource`].
///
/// Issues exactly one GET per [`discover`](MetadataSource::discover) call and
/// never retries; the configured timeout bounds the whole round trip.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    client: reqwest::Client,
    api_version: String,
    timeout_secs: u64,
}

impl MetadataClient {
    /// Creates a client with default timeout and api-version.
    pub fn new() -> Result<Self, DiscoveryError> {
        Self::from_config(&DiscoveryConfig::default())
    }

    pub fn from_config(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DiscoveryError::ClientCreation {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_version: config.api_version().to_string(),
            timeout_secs: config.timeout_secs(),
        })
    }

    /// Builds `<root>/metadata/endpoints?api-version=<v>` from an ARM root.
    pub fn metadata_url(&self, resource_manager_endpoint: &str) -> Result<Url, DiscoveryError> {
        let invalid = |reason: String| DiscoveryError::InvalidEndpoint {
            endpoint: resource_manager_endpoint.to_string(),
            reason,
        };

        let root = Url::parse(resource_manager_endpoint.trim())
            .map_err(|e| invalid(e.to_string()))?;
        if root.scheme() != "https" && root.scheme() != "http" {
            return Err(invalid(format!("unsupported scheme '{}'", root.scheme())));
        }
        if root.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        let base = root.as_str().split(['?', '#']).next().unwrap_or_default();
        let mut url = Url::parse(&format!("{}/{METADATA_PATH}", base.trim_end_matches('/')))
            .map_err(|e| invalid(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    fn request_error(&self, url: &Url, error: reqwest::Error) -> DiscoveryError {
        if error.is_timeout() {
            DiscoveryError::Timeout {
                url: url.to_string(),
                seconds: self.timeout_secs,
            }
        } else {
            DiscoveryError::RequestFailed {
                url: url.to_string(),
                reason: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl MetadataSource for MetadataClient {
    async fn discover(
        &self,
        resource_manager_endpoint: &str,
    ) -> Result<DiscoveryResult, DiscoveryError> {
        let url = self.metadata_url(resource_manager_endpoint)?;
        log::info!("Retrieving environment metadata from {url}");

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.request_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Metadata endpoint {url} returned {status}");
            return Err(DiscoveryError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.request_error(&url, e))?;

        let document: MetadataDocument =
            serde_json::from_str(&body).map_err(|e| DiscoveryError::InvalidResponse {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let result =
            DiscoveryResult::from_document(resource_manager_endpoint, document, url.as_str())?;
        log::debug!(
            "Discovered login endpoint {} (on premise: {}), domain {}",
            result.login_endpoint,
            result.on_premise,
            result.domain
        );
        Ok(result)
    }
}
