use crate::error::AppError;
use config::{Config, Environment, File};
use std::path::Path;

pub mod app;
pub mod validation;

pub use app::{AppConfig, LoggingConfig};
pub use validation::ConfigValidationError;

/// Prefix of environment variables read into the configuration,
/// e.g. `CLOUDENV__LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "CLOUDENV";

/// Base name of the optional configuration file in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Loads, deserializes and validates the application configuration.
///
/// Sources, lowest precedence first: the configuration file (`path` when
/// given, otherwise an optional `config.toml` in the working directory),
/// then `CLOUDENV__*` environment variables, including those from `.env`.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, AppError> {
    dotenv::dotenv().ok();

    let file_source = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };
    let env_source = Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true);

    let config = Config::builder()
        .add_source(file_source)
        .add_source(env_source)
        .build()
        .map_err(|e| {
            AppError::Config(format!(
                "Configuration loading failed: {e}. \
                Please check your config file and environment variables."
            ))
        })?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| AppError::Config(format!("Failed to deserialize config: {e}")))?;

    if let Err(validation_errors) = app_config.validate() {
        let error_messages: Vec<String> =
            validation_errors.iter().map(|e| e.user_message()).collect();
        return Err(AppError::Config(format!(
            "Configuration validation failed:\n{}",
            error_messages.join("\n\n")
        )));
    }

    Ok(app_config)
}
