use crate::config::types::KackyConfig;
use crate::errors::ConfigError;

/// Validate the merged configuration.
///
/// # Errors
///
/// Returns `ConfigError::InvalidConfiguration` for a zero poll interval,
/// a zero timeout, or an API URL that is not http(s).
pub fn validate_config(config: &KackyConfig) -> Result<(), ConfigError> {
    if config.poller.interval_secs() == 0 {
        return Err(invalid("poller.interval_secs must be greater than zero"));
    }

    if config.api.timeout_secs() == 0 {
        return Err(invalid("api.timeout_secs must be greater than zero"));
    }

    let url = config.api.url().trim();
    if url.is_empty() {
        return Err(invalid("api.url must not be empty"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("api.url '{}' must start with http:// or https://", url),
        });
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::InvalidConfiguration {
        message: message.to_string(),
    }
}
