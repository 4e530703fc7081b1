use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postpick_core::{
    load_config, validate_config, ApifyScraper, InMemoryTaskStore, JsonFileTaskStore, Scraper,
    ScraperBackend, TaskOrchestrator, TaskStore,
};

use postpick_server::api::create_router;
use postpick_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
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

    info!("Postpick v{} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("POSTPICK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");

    // Create task store
    let task_store: Arc<dyn TaskStore> = match &config.storage.tasks_dir {
        Some(dir) => {
            info!("Using JSON file task store at {:?}", dir);
            Arc::new(JsonFileTaskStore::new(dir.clone()).context("Failed to create task store")?)
        }
        None => {
            info!("Using in-memory task store");
            Arc::new(InMemoryTaskStore::new())
        }
    };

    // Create scraper backend
    let scraper: Arc<dyn Scraper> = match &config.scrapers {
        Some(scrapers_config) => match scrapers_config.backend {
            ScraperBackend::Apify => {
                let Some(apify_config) = &scrapers_config.apify else {
                    bail!("Apify backend selected but no apify config provided");
                };
                info!("Initializing Apify scraper at {}", apify_config.base_url);
                Arc::new(ApifyScraper::new(apify_config.clone()))
            }
        },
        None => {
            bail!("No scraper backend configured; set the [scrapers] config section");
        }
    };

    // Create orchestrator
    let orchestrator = Arc::new(TaskOrchestrator::new(
        config.orchestrator.clone(),
        Arc::clone(&task_store),
        scraper,
    ));
    info!("Task orchestrator initialized");

    // Create app state
    let app_state = Arc::new(AppState::new(config.clone(), task_store, orchestrator));

    // Create router
    let app = create_router(app_state);

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
