//! Environment resolution and merge.
//!
//! [`EnvironmentResolver::resolve`] turns an [`EnvironmentRequest`] into the
//! environment that should be stored under the requested name:
//!
//! 1. refuse names of built-in environments;
//! 2. for discovery requests, fetch the deployment metadata and translate it
//!    into the same override list an explicit request carries;
//! 3. start from the stored environment of that name, or a fresh one;
//! 4. overlay every non-empty override and always overwrite `on_premise`.
//!
//! The resolver never writes to the store. Persisting the returned
//! environment is the caller's single write-back.
//!
//! # Examples
//!
//! ```no_run
//! use engine::discovery::MetadataClient;
//! use engine::environment::EndpointKind;
//! use engine::resolver::{EndpointOverrides, EnvironmentRequest, EnvironmentResolver};
//! use engine::store::{EnvironmentStore, InMemoryEnvironmentStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryEnvironmentStore::new();
//! let resolver = EnvironmentResolver::new(MetadataClient::new()?);
//!
//! let request = EnvironmentRequest::explicit(
//!     "Custom1",
//!     EndpointOverrides::new().with(EndpointKind::ResourceManager, "https://management.custom/"),
//!     false,
//! );
//! let environment = resolver.resolve(&store, request).await?;
//! store.put(environment).await?;
//! # Ok(())
//! # }
//! ```

use crate::common::errors::{DiscoveryError, EnvironmentError};
use crate::discovery::{DiscoveryResult, MetadataSource};
use crate::environment::builtin::find_protected;
use crate::environment::{EndpointKind, Environment};
use crate::store::EnvironmentStore;
use tokio_util::sync::CancellationToken;

/// Ordered `(kind, value)` pairs of one request.
///
/// `None` and empty values are carried along but never written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointOverrides(Vec<(EndpointKind, Option<String>)>);

impl EndpointOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`push`](Self::push) for a present value.
    pub fn with(mut self, kind: EndpointKind, value: impl Into<String>) -> Self {
        self.push(kind, Some(value.into()));
        self
    }

    pub fn push(&mut self, kind: EndpointKind, value: Option<String>) {
        self.0.push((kind, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (EndpointKind, Option<&str>)> {
        self.0.iter().map(|(kind, value)| (*kind, value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(EndpointKind, Option<String>)> for EndpointOverrides {
    fn from_iter<I: IntoIterator<Item = (EndpointKind, Option<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What the caller wants done to one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentRequest {
    /// Endpoint values supplied directly.
    Explicit {
        name: String,
        endpoints: EndpointOverrides,
        on_premise: bool,
    },
    /// Endpoints discovered from an Azure Resource Manager root.
    Discovery { name: String, arm_endpoint: String },
}

impl EnvironmentRequest {
    pub fn explicit(
        name: impl Into<String>,
        endpoints: EndpointOverrides,
        on_premise: bool,
    ) -> Self {
        EnvironmentRequest::Explicit {
            name: name.into(),
            endpoints,
            on_premise,
        }
    }

    pub fn discovery(name: impl Into<String>, arm_endpoint: impl Into<String>) -> Self {
        EnvironmentRequest::Discovery {
            name: name.into(),
            arm_endpoint: arm_endpoint.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EnvironmentRequest::Explicit { name, .. }
            | EnvironmentRequest::Discovery { name, .. } => name,
        }
    }
}

/// Stateless merge engine; see the module docs for the algorithm.
#[derive(Debug, Clone)]
pub struct EnvironmentResolver<M> {
    metadata: M,
}

impl<M: MetadataSource> EnvironmentResolver<M> {
    pub fn new(metadata: M) -> Self {
        Self { metadata }
    }

    pub fn metadata_source(&self) -> &M {
        &self.metadata
    }

    /// Resolves `request` against the environment currently held by `store`.
    ///
    /// # Errors
    ///
    /// - [`EnvironmentError::ProtectedEnvironment`] for built-in names, before
    ///   any store read or network call
    /// - [`EnvironmentError::Discovery`] when metadata discovery fails
    /// - [`EnvironmentError::Store`] when reading the existing environment fails
    pub async fn resolve<S>(
        &self,
        store: &S,
        request: EnvironmentRequest,
    ) -> Result<Environment, EnvironmentError>
    where
        S: EnvironmentStore + ?Sized,
    {
        self.resolve_with_cancellation(store, request, &CancellationToken::new())
            .await
    }

    /// Like [`resolve`](Self::resolve), but an outstanding discovery request is
    /// abandoned as soon as `cancel` fires, failing with
    /// [`DiscoveryError::Cancelled`].
    pub async fn resolve_with_cancellation<S>(
        &self,
        store: &S,
        request: EnvironmentRequest,
        cancel: &CancellationToken,
    ) -> Result<Environment, EnvironmentError>
    where
        S: EnvironmentStore + ?Sized,
    {
        let built_in_names = store.built_in_names();
        if let Some(built_in) =
            find_protected(built_in_names.iter().map(String::as_str), request.name())
        {
            log::warn!("Refusing to modify built-in environment {built_in}");
            return Err(EnvironmentError::ProtectedEnvironment {
                name: built_in.to_string(),
            });
        }

        let (name, overrides, on_premise) = match request {
            EnvironmentRequest::Explicit {
                name,
                endpoints,
                on_premise,
            } => (name, endpoints, on_premise),
            EnvironmentRequest::Discovery { name, arm_endpoint } => {
                let discovered = self.discover(&arm_endpoint, cancel).await?;
                (name, overrides_from_discovery(&discovered), discovered.on_premise)
            }
        };

        let mut environment = match store.get(&name).await? {
            Some(existing) => {
                log::debug!("Updating existing environment {}", existing.name());
                existing
            }
            None => {
                log::debug!("Creating environment {name}");
                Environment::new(name)
            }
        };

        environment.set_on_premise(on_premise);
        let written = apply_overrides(&mut environment, &overrides);
        log::info!(
            "Resolved environment {}: {written} endpoint(s) set, on premise: {on_premise}",
            environment.name()
        );

        Ok(environment)
    }

    async fn discover(
        &self,
        arm_endpoint: &str,
        cancel: &CancellationToken,
    ) -> Result<DiscoveryResult, DiscoveryError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::warn!("Metadata discovery for {arm_endpoint} cancelled");
                Err(DiscoveryError::Cancelled { url: arm_endpoint.to_string() })
            }
            result = self.metadata.discover(arm_endpoint) => result,
        }
    }
}

/// Translates a discovery result into the overrides an explicit request
/// would have carried.
pub fn overrides_from_discovery(discovered: &DiscoveryResult) -> EndpointOverrides {
    let domain = &discovered.domain;
    EndpointOverrides::new()
        .with(
            EndpointKind::ResourceManager,
            discovered.resource_manager_endpoint.as_str(),
        )
        .with(EndpointKind::ActiveDirectory, discovered.login_endpoint.as_str())
        .with(
            EndpointKind::ActiveDirectoryServiceEndpointResourceId,
            discovered.primary_audience(),
        )
        .with(EndpointKind::Gallery, discovered.gallery_endpoint.as_str())
        .with(EndpointKind::Graph, discovered.graph_endpoint.as_str())
        .with(EndpointKind::StorageEndpointSuffix, domain.as_str())
        .with(
            EndpointKind::AzureKeyVaultDnsSuffix,
            format!("vault.{domain}").to_lowercase(),
        )
        .with(
            EndpointKind::AzureKeyVaultServiceEndpointResourceId,
            format!("https://vault.{domain}").to_lowercase(),
        )
}

/// Set-if-present pass over `overrides`; returns how many fields were written.
pub fn apply_overrides(environment: &mut Environment, overrides: &EndpointOverrides) -> usize {
    let endpoints = environment.endpoints_mut();
    let mut written = 0;
    for (kind, value) in overrides.iter() {
        if endpoints.set_if_provided(kind, value) {
            written += 1;
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovered(domain: &str) -> DiscoveryResult {
        DiscoveryResult {
            login_endpoint: "https://login.mystack.local/".to_string(),
            audiences: vec!["urn:first".to_string(), "urn:second".to_string()],
            portal_endpoint: format!("https://portal.{domain}/"),
            gallery_endpoint: "https://gallery.mystack.local/".to_string(),
            graph_endpoint: String::new(),
            resource_manager_endpoint: "https://management.mystack.local/".to_string(),
            domain: domain.to_string(),
            on_premise: false,
        }
    }

    #[test]
    fn test_overrides_from_discovery_lowercases_key_vault_values() {
        let overrides = overrides_from_discovery(&discovered("MyStack.Local"));
        let values: Vec<(EndpointKind, Option<&str>)> = overrides.iter().collect();

        assert!(values.contains(&(
            EndpointKind::AzureKeyVaultDnsSuffix,
            Some("vault.mystack.local")
        )));
        assert!(values.contains(&(
            EndpointKind::AzureKeyVaultServiceEndpointResourceId,
            Some("https://vault.mystack.local")
        )));
        assert!(values.contains(&(EndpointKind::StorageEndpointSuffix, Some("MyStack.Local"))));
        assert!(values.contains(&(
            EndpointKind::ActiveDirectoryServiceEndpointResourceId,
            Some("urn:first")
        )));
    }

    #[test]
    fn test_apply_overrides_skips_empty_values() {
        let mut env = Environment::new("Custom");
        env.endpoints_mut()
            .set_if_provided(EndpointKind::Graph, Some("https://graph.old/"));

        let written = apply_overrides(
            &mut env,
            &overrides_from_discovery(&discovered("mystack.local")),
        );

        assert_eq!(written, 7);
        assert_eq!(env.endpoint(EndpointKind::Graph), Some("https://graph.old/"));
    }

    #[test]
    fn test_request_name() {
        let explicit = EnvironmentRequest::explicit("A", EndpointOverrides::new(), true);
        let discovery = EnvironmentRequest::discovery("B", "https://arm/");
        assert_eq!(explicit.name(), "A");
        assert_eq!(discovery.name(), "B");
    }
}
