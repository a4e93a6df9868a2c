pub mod affinity;
pub mod aggregator;
pub mod cache;
pub mod config;
pub mod content;
pub mod coordinator;
pub mod frequency;
pub mod metrics;
pub mod source;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use affinity::{AffinityError, AffinityResolver, HttpAffinityResolver, NoneAffinityResolver};
pub use aggregator::Aggregator;
pub use cache::{CacheEntry, CacheError, CacheStats, SqliteStreamCache, StreamCache};
pub use config::{
    apply_legacy_env, load_config, load_config_from_env, load_config_from_str, validate_config,
    Config, ConfigError, SanitizedConfig,
};
pub use content::{ContentError, ContentId, ContentType};
pub use coordinator::{CacheCoordinator, CoordinatorConfig, CoordinatorError, OrderingPolicy};
pub use frequency::{FrequencyPolicy, FrequencyTracker, RequestLog, RequestLogError, SqliteRequestLog};
pub use source::{HttpSource, SourceError, Stream, StreamSource};
