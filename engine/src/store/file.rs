use super::{EnvironmentStore, store_key};
use crate::common::errors::StoreError;
use crate::environment::Environment;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const PROFILE_DIR: &str = "cloudenv";
const PROFILE_FILE: &str = "environments.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileDocument {
    #[serde(default)]
    environments: Vec<Environment>,
}

/// Environment store persisted as a JSON profile file.
///
/// File layout: `{ "environments": [ ... ] }`. A missing file reads as an
/// empty profile. Writes go to a sibling temp file that is renamed over the
/// profile, so readers never observe a half-written document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `<config dir>/cloudenv/environments.json`
    pub fn default_path() -> Result<PathBuf, StoreError> {
        dirs::config_dir()
            .map(|dir| dir.join(PROFILE_DIR).join(PROFILE_FILE))
            .ok_or(StoreError::NoConfigDirectory)
    }

    pub fn at_default_location() -> Result<Self, StoreError> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, path: &Path, error: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.display().to_string(),
            reason: error.to_string(),
        }
    }

    async fn load(&self) -> Result<ProfileDocument, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Profile {} does not exist yet", self.path.display());
                return Ok(ProfileDocument::default());
            }
            Err(e) => return Err(self.io_error(&self.path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(ProfileDocument::default());
        }

        serde_json::from_str(&contents).map_err(|e| StoreError::Serialization {
            reason: format!("{}: {e}", self.path.display()),
        })
    }

    async fn save(&self, document: &ProfileDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(parent, e))?;
        }

        let contents =
            serde_json::to_string_pretty(document).map_err(|e| StoreError::Serialization {
                reason: e.to_string(),
            })?;

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, contents)
            .await
            .map_err(|e| self.io_error(&temp_path, e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error(&self.path, e))
    }
}

#[async_trait]
impl EnvironmentStore for JsonFileStore {
    async fn get(&self, name: &str) -> Result<Option<Environment>, StoreError> {
        let document = self.load().await?;
        Ok(document
            .environments
            .into_iter()
            .find(|env| env.is_named(name)))
    }

    async fn put(&self, environment: Environment) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        document
            .environments
            .retain(|env| !env.is_named(environment.name()));
        log::info!(
            "Saving environment '{}' to {}",
            environment.name(),
            self.path.display()
        );
        document.environments.push(environment);
        document
            .environments
            .sort_by_key(|env| store_key(env.name()));

        self.save(&document).await
    }

    async fn list(&self) -> Result<Vec<Environment>, StoreError> {
        let mut environments = self.load().await?.environments;
        environments.sort_by_key(|env| store_key(env.name()));
        Ok(environments)
    }
}
