/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid discovery.timeout_secs: {configured} (min: {min_limit}, max: {max_limit})")]
    DiscoveryTimeout {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
    #[error("Invalid discovery.api_version: value is empty")]
    EmptyApiVersion,
    #[error("Invalid logging.level: {configured}")]
    LogLevel { configured: String },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::DiscoveryTimeout {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Discovery timeout out of range!\n\
                    Your configured value: {configured} seconds\n\
                    Valid range: {min_limit} - {max_limit} seconds\n\
                    Please update timeout_secs in the [discovery] section."
                )
            }
            ConfigValidationError::EmptyApiVersion => "Discovery api version is empty!\n\
                Please set api_version in the [discovery] section or remove it to use the default."
                .to_string(),
            ConfigValidationError::LogLevel { configured } => {
                format!(
                    "Unknown log level!\n\
                    Your configured value: {configured}\n\
                    Valid levels: trace, debug, info, warn, error\n\
                    Please update level in the [logging] section."
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_names_the_setting() {
        let error = ConfigValidationError::DiscoveryTimeout {
            configured: 0,
            min_limit: 1,
            max_limit: 300,
        };
        let message = error.user_message();

        assert!(message.contains("timeout_secs"));
        assert!(message.contains("1 - 300"));
        assert!(
            ConfigValidationError::LogLevel {
                configured: "loud".to_string()
            }
            .user_message()
            .contains("loud")
        );
    }
}
