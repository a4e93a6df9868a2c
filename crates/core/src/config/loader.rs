use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for structured environment overrides, e.g.
/// `STREAMHOARD_CACHE__EVICTION_THRESHOLD=3`.
const ENV_PREFIX: &str = "STREAMHOARD_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(apply_legacy_env(config, std::env::vars()))
}

/// Load configuration from environment variables only
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(apply_legacy_env(config, std::env::vars()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Apply the unprefixed variables older deployments were configured with.
///
/// - `SOURCE_*`: each non-empty value is appended to `providers.urls`,
///   ordered by variable name
/// - `TIMEOUT_MS`: provider timeout
/// - `RANDOMIZE_STREAMS`: shuffle output when exactly `"true"`
/// - `DELETION_THRESHOLD`: eviction threshold; zero or unparsable values are ignored
pub fn apply_legacy_env<I>(mut config: Config, vars: I) -> Config
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut sources = Vec::new();

    for (key, value) in vars {
        match key.as_str() {
            "TIMEOUT_MS" => match value.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.providers.timeout_ms = ms,
                _ => tracing::warn!(value = %value, "Ignoring invalid TIMEOUT_MS"),
            },
            "RANDOMIZE_STREAMS" => config.cache.randomize_streams = value == "true",
            "DELETION_THRESHOLD" => match value.trim().parse::<u32>() {
                Ok(threshold) if threshold > 0 => config.cache.eviction_threshold = threshold,
                _ => tracing::warn!(value = %value, "Ignoring invalid DELETION_THRESHOLD"),
            },
            _ if key.starts_with("SOURCE_") && !value.trim().is_empty() => {
                sources.push((key, value.trim().to_string()));
            }
            _ => {}
        }
    }

    sources.sort_by(|a, b| a.0.cmp(&b.0));
    config
        .providers
        .urls
        .extend(sources.into_iter().map(|(_, url)| url));

    config
}
