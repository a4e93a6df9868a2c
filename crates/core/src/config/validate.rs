use super::{types::Config, ConfigError};

/// Longest accepted eviction window (one year).
pub const MAX_EVICTION_WINDOW_SECS: u64 = 365 * 24 * 60 * 60;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Provider timeout, eviction threshold and window are positive
/// - Eviction window is at most [`MAX_EVICTION_WINDOW_SECS`]
/// - Provider URLs are http(s)
/// - Affinity endpoint and token are non-empty when the section is present
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.providers.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "providers.timeout_ms cannot be 0".to_string(),
        ));
    }

    for url in &config.providers.urls {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "providers.urls entry must be an http(s) URL: {:?}",
                url
            )));
        }
    }

    if config.cache.eviction_threshold == 0 {
        return Err(ConfigError::ValidationError(
            "cache.eviction_threshold cannot be 0".to_string(),
        ));
    }

    if config.cache.eviction_window_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.eviction_window_secs cannot be 0".to_string(),
        ));
    }

    if config.cache.eviction_window_secs > MAX_EVICTION_WINDOW_SECS {
        return Err(ConfigError::ValidationError(format!(
            "cache.eviction_window_secs cannot exceed {}",
            MAX_EVICTION_WINDOW_SECS
        )));
    }

    if let Some(ref affinity) = config.affinity {
        if affinity.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "affinity.endpoint cannot be empty".to_string(),
            ));
        }
        if affinity.api_token.is_empty() {
            return Err(ConfigError::ValidationError(
                "affinity.api_token cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
