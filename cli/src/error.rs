use engine::common::errors::{EnvironmentError, StoreError};
use thiserror::Error;

/// Application-level error type for the command line front end
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Environment {name} was not found.")]
    EnvironmentNotFound { name: String },

    #[error("Logger setup failed: {0}")]
    Logger(String),

    #[error("Failed to write output: {0}")]
    Output(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        AppError::Output(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Output(error.to_string())
    }
}

impl From<log::SetLoggerError> for AppError {
    fn from(error: log::SetLoggerError) -> Self {
        AppError::Logger(error.to_string())
    }
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            _ => 1,
        }
    }
}
