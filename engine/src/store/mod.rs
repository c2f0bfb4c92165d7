//! Environment stores.
//!
//! The store owns the durable set of custom environments. The resolver reads
//! from it once per call; writing the merged result back is the caller's job.
//!
//! Contract for implementations: names are compared case-insensitively and
//! `put` is last-writer-wins per environment. Concurrent `put`s for the same
//! name must be serialized by the store itself.

pub mod file;

pub use file::JsonFileStore;

use crate::common::errors::StoreError;
use crate::environment::{Environment, name_key};
use crate::environment::builtin::BUILT_IN_NAMES;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[async_trait]
pub trait EnvironmentStore: Send + Sync {
    /// Custom environment registered under `name`, case-insensitively.
    async fn get(&self, name: &str) -> Result<Option<Environment>, StoreError>;

    /// Inserts or replaces the environment with the same name.
    async fn put(&self, environment: Environment) -> Result<(), StoreError>;

    /// All custom environments, ordered by name.
    async fn list(&self) -> Result<Vec<Environment>, StoreError>;

    /// Names the resolver must refuse to modify.
    fn built_in_names(&self) -> Vec<String> {
        BUILT_IN_NAMES.iter().map(|name| name.to_string()).collect()
    }
}

pub(crate) fn store_key(name: &str) -> String {
    name_key(name)
}

/// Process-local store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryEnvironmentStore {
    environments: RwLock<HashMap<String, Environment>>,
}

impl InMemoryEnvironmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environments(environments: impl IntoIterator<Item = Environment>) -> Self {
        let environments = environments
            .into_iter()
            .map(|env| (store_key(env.name()), env))
            .collect();
        Self {
            environments: RwLock::new(environments),
        }
    }
}

#[async_trait]
impl EnvironmentStore for InMemoryEnvironmentStore {
    async fn get(&self, name: &str) -> Result<Option<Environment>, StoreError> {
        Ok(self.environments.read().await.get(&store_key(name)).cloned())
    }

    async fn put(&self, environment: Environment) -> Result<(), StoreError> {
        self.environments
            .write()
            .await
            .insert(store_key(environment.name()), environment);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Environment>, StoreError> {
        let mut environments: Vec<Environment> =
            self.environments.read().await.values().cloned().collect();
        environments.sort_by_key(|env| store_key(env.name()));
        Ok(environments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EndpointKind;

    fn named(name: &str, resource_manager: &str) -> Environment {
        let mut env = Environment::new(name);
        env.endpoints_mut()
            .set_if_provided(EndpointKind::ResourceManager, Some(resource_manager));
        env
    }

    #[tokio::test]
    async fn test_get_is_case_insensitive() {
        let store = InMemoryEnvironmentStore::with_environments([named("MyStack", "https://a/")]);

        let found = store.get("mystack").await.unwrap().unwrap();
        assert_eq!(found.name(), "MyStack");
        assert!(store.get("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_is_last_writer_wins() {
        let store = InMemoryEnvironmentStore::new();
        store.put(named("MyStack", "https://a/")).await.unwrap();
        store.put(named("MYSTACK", "https://b/")).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(
            all[0].endpoint(EndpointKind::ResourceManager),
            Some("https://b/")
        );
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let store = InMemoryEnvironmentStore::with_environments([
            named("zeta", "https://z/"),
            named("Alpha", "https://a/"),
        ]);

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|env| env.name().to_string())
            .collect();
        assert_eq!(names, ["Alpha", "zeta"]);
    }

    #[test]
    fn test_default_built_in_names() {
        let store = InMemoryEnvironmentStore::new();
        assert_eq!(store.built_in_names(), BUILT_IN_NAMES);
    }
}
