use super::validation::ConfigValidationError;
use engine::discovery::DiscoveryConfig;
use serde::Deserialize;
use std::path::Path;

pub const MIN_DISCOVERY_TIMEOUT_SECS: u64 = 1;
pub const MAX_DISCOVERY_TIMEOUT_SECS: u64 = 300;
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    discovery: DiscoveryConfig,
    /// Location of the environments profile (default: user config directory)
    profile_path: Option<String>,
}

impl AppConfig {
    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn discovery(&self) -> &DiscoveryConfig {
        &self.discovery
    }

    pub fn profile_path(&self) -> Option<&Path> {
        self.profile_path.as_deref().map(Path::new)
    }

    /// Checks every setting and reports all problems at once.
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let timeout = self.discovery.timeout_secs();
        if !(MIN_DISCOVERY_TIMEOUT_SECS..=MAX_DISCOVERY_TIMEOUT_SECS).contains(&timeout) {
            errors.push(ConfigValidationError::DiscoveryTimeout {
                configured: timeout,
                min_limit: MIN_DISCOVERY_TIMEOUT_SECS,
                max_limit: MAX_DISCOVERY_TIMEOUT_SECS,
            });
        }

        if self.discovery.api_version().trim().is_empty() {
            errors.push(ConfigValidationError::EmptyApiVersion);
        }

        let level = self.logging.level().to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::LogLevel {
                configured: self.logging.level().to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn new(level: Option<&str>, file: Option<&str>) -> Self {
        Self {
            level: level.map(str::to_string),
            file: file.map(str::to_string),
        }
    }

    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    /// Log file path; logs go to stderr when unset.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
