use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use streamhoard_core::{
    load_config, load_config_from_env, validate_config, AffinityResolver, Aggregator,
    CacheCoordinator, CoordinatorConfig, HttpAffinityResolver, HttpSource, NoneAffinityResolver,
    RequestLog, SqliteRequestLog, SqliteStreamCache, StreamCache, StreamSource,
};

use streamhoard_server::api::create_router;
use streamhoard_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("STREAMHOARD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; without a file every setting comes from the environment
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!(
            "No config file at {:?}, using environment and defaults",
            config_path
        );
        load_config_from_env().context("Failed to load config from environment")?
    };

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!(
        "Eviction policy: {} requests per {}s",
        config.cache.eviction_threshold, config.cache.eviction_window_secs
    );

    // Both stores share the database file, each with its own connection
    let cache: Arc<dyn StreamCache> = Arc::new(
        SqliteStreamCache::new(&config.database.path).context("Failed to create stream cache")?,
    );
    let request_log: Arc<dyn RequestLog> = Arc::new(
        SqliteRequestLog::new(&config.database.path).context("Failed to create request log")?,
    );
    info!("Stream cache initialized");

    // Create provider sources
    if config.providers.urls.is_empty() {
        warn!("No provider URLs configured, every request will return no streams");
    }
    let sources: Vec<Arc<dyn StreamSource>> = HttpSource::from_urls(
        &config.providers.urls,
        Duration::from_millis(config.providers.timeout_ms),
    )
    .context("Failed to create provider sources")?
    .into_iter()
    .map(|source| {
        info!("Provider: {}", source.base_url());
        Arc::new(source) as Arc<dyn StreamSource>
    })
    .collect();

    // Create affinity resolver if configured
    let resolver: Arc<dyn AffinityResolver> = match &config.affinity {
        Some(affinity_config) => {
            info!("Initializing affinity resolver at {}", affinity_config.endpoint);
            Arc::new(
                HttpAffinityResolver::new(affinity_config.clone())
                    .context("Failed to create affinity resolver")?,
            )
        }
        None => {
            info!("No affinity resolver configured");
            Arc::new(NoneAffinityResolver::new())
        }
    };

    let coordinator = CacheCoordinator::new(
        CoordinatorConfig::from(&config),
        Aggregator::new(sources, resolver),
        Arc::clone(&cache),
        request_log,
    );

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), coordinator, cache));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
