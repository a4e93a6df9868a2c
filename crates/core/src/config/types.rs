use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Direct-URL resolver for magnet streams. Absent means every stream is
    /// reported as not cached.
    #[serde(default)]
    pub affinity: Option<AffinityConfig>,
    #[serde(default)]
    pub addon: AddonConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    7005
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("streams.db")
}

/// Upstream stream providers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    /// Provider base URLs, queried in this order.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Per-request timeout in milliseconds (default: 2000)
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            timeout_ms: default_provider_timeout_ms(),
        }
    }
}

fn default_provider_timeout_ms() -> u64 {
    2000
}

/// Cache behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Shuffle output instead of listing cached streams first.
    #[serde(default)]
    pub randomize_streams: bool,
    /// Requests per window that invalidate a title (default: 5)
    #[serde(default = "default_eviction_threshold")]
    pub eviction_threshold: u32,
    /// Sliding window in seconds (default: 3600)
    #[serde(default = "default_eviction_window_secs")]
    pub eviction_window_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            randomize_streams: false,
            eviction_threshold: default_eviction_threshold(),
            eviction_window_secs: default_eviction_window_secs(),
        }
    }
}

fn default_eviction_threshold() -> u32 {
    5
}

fn default_eviction_window_secs() -> u64 {
    3600
}

/// Affinity resolver configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AffinityConfig {
    /// Resolver endpoint receiving `POST {"torrent": url}`
    pub endpoint: String,
    /// Bearer token
    pub api_token: String,
    /// Request timeout in milliseconds (default: 5000)
    #[serde(default = "default_affinity_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_affinity_timeout_ms() -> u64 {
    5000
}

/// Add-on manifest metadata
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddonConfig {
    #[serde(default = "default_addon_id")]
    pub id: String,
    #[serde(default = "default_addon_name")]
    pub name: String,
    #[serde(default = "default_addon_version")]
    pub version: String,
    #[serde(default = "default_addon_description")]
    pub description: String,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            id: default_addon_id(),
            name: default_addon_name(),
            version: default_addon_version(),
            description: default_addon_description(),
        }
    }
}

fn default_addon_id() -> String {
    "org.stremio.combined".to_string()
}

fn default_addon_name() -> String {
    "Stremio Addon Database Wrapper".to_string()
}

fn default_addon_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_addon_description() -> String {
    "Fetches results from add-ons and stores in a local database.".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub providers: ProvidersConfig,
    pub cache: CacheConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affinity: Option<SanitizedAffinityConfig>,
    pub addon: AddonConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAffinityConfig {
    pub endpoint: String,
    pub api_token: String,
    pub timeout_ms: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            providers: config.providers.clone(),
            cache: config.cache.clone(),
            affinity: config.affinity.as_ref().map(|a| SanitizedAffinityConfig {
                endpoint: a.endpoint.clone(),
                api_token: "[REDACTED]".to_string(),
                timeout_ms: a.timeout_ms,
            }),
            addon: config.addon.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 7005);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path, PathBuf::from("streams.db"));
        assert!(config.providers.urls.is_empty());
        assert_eq!(config.providers.timeout_ms, 2000);
        assert!(!config.cache.randomize_streams);
        assert_eq!(config.cache.eviction_threshold, 5);
        assert_eq!(config.cache.eviction_window_secs, 3600);
        assert!(config.affinity.is_none());
        assert_eq!(config.addon.id, "org.stremio.combined");
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
path = "/var/lib/streamhoard/streams.db"

[providers]
urls = ["https://a.example.com", "https://b.example.com/manifest.json"]
timeout_ms = 1500

[cache]
randomize_streams = true
eviction_threshold = 3
eviction_window_secs = 600

[affinity]
endpoint = "https://resolver.example.com/check"
api_token = "secret"

[addon]
name = "My Hoard"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.providers.urls.len(), 2);
        assert_eq!(config.providers.timeout_ms, 1500);
        assert!(config.cache.randomize_streams);
        assert_eq!(config.cache.eviction_threshold, 3);
        assert_eq!(config.cache.eviction_window_secs, 600);

        let affinity = config.affinity.unwrap();
        assert_eq!(affinity.api_token, "secret");
        assert_eq!(affinity.timeout_ms, 5000);

        assert_eq!(config.addon.name, "My Hoard");
        assert_eq!(config.addon.id, "org.stremio.combined");
    }

    #[test]
    fn test_affinity_requires_token() {
        let toml = r#"
[affinity]
endpoint = "https://resolver.example.com/check"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_sanitized_config_redacts_token() {
        let config = Config {
            affinity: Some(AffinityConfig {
                endpoint: "https://resolver.example.com".to_string(),
                api_token: "super-secret".to_string(),
                timeout_ms: 1000,
            }),
            ..Default::default()
        };

        let sanitized = SanitizedConfig::from(&config);
        let json = serde_json::to_string(&sanitized).unwrap();

        assert!(!json.contains("super-secret"));
        assert!(json.contains("[REDACTED]"));
        assert!(json.contains("resolver.example.com"));
    }

    #[test]
    fn test_sanitized_config_omits_missing_affinity() {
        let sanitized = SanitizedConfig::from(&Config::default());
        let json = serde_json::to_value(&sanitized).unwrap();
        assert!(json.get("affinity").is_none());
        assert_eq!(json["server"]["port"], 7005);
    }
}
