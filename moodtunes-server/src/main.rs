//! moodtunes-server - emotion-based music recommendations
//!
//! Classifies free text, answers with songs matching the detected emotion,
//! and records each prediction for the statistics chart.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use moodtunes_common::classifier::load_classifier_or_unavailable;
use moodtunes_common::config::{load_config, ConfigSource};
use moodtunes_common::db::{init_database, PredictionLog, SqlitePredictionLog};
use moodtunes_common::{SongCatalog, SongSelector};
use moodtunes_server::cli::Args;
use moodtunes_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, config_source) =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(&args.overrides());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting MoodTunes (moodtunes-server) v{}",
        env!("CARGO_PKG_VERSION")
    );

    match &config_source {
        ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
        ConfigSource::Missing(path) => warn!(
            "Config file {} not found, using defaults",
            path.display()
        ),
        ConfigSource::Defaults => info!("No config file found, using defaults"),
    }

    if args.setup_db {
        let pool = init_database(&config.database_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to initialize database {}",
                    config.database_path.display()
                )
            })?;
        pool.close().await;
        info!("Database ready: {}", config.database_path.display());
        return Ok(());
    }

    if let Some(limit) = args.recent {
        let log = SqlitePredictionLog::open(&config.database_path);
        let records = log.recent(limit).await.with_context(|| {
            format!(
                "Failed to read predictions from {}",
                config.database_path.display()
            )
        })?;
        for record in records {
            println!(
                "{:>6}  {}  {:<10}  {}",
                record.id, record.timestamp, record.predicted_emotion, record.text_input
            );
        }
        return Ok(());
    }

    let aliases = Arc::new(config.alias_table().context("Invalid alias table")?);
    info!("Alias table: {} entries", aliases.len());

    let classifier = load_classifier_or_unavailable(&config.model_path);

    let catalog = Arc::new(SongCatalog::load(&config.catalog_path));
    info!(
        "Catalog: {} songs across {} emotions",
        catalog.len(),
        catalog.emotions().len()
    );

    // Empty label set when degraded; only catalog coverage is checked then
    let report = aliases.validate_against(classifier.labels(), &catalog.emotions());
    for (alias, target) in &report.unreachable_targets {
        warn!(
            "Alias '{}' -> '{}': the classifier never produces '{}'",
            alias, target, target
        );
    }
    for (label, normalized) in &report.unmatched_labels {
        warn!(
            "Classifier label '{}' normalizes to '{}', which no catalog song is tagged with",
            label, normalized
        );
    }

    let prediction_log: Arc<dyn PredictionLog> = match init_database(&config.database_path).await
    {
        Ok(pool) => Arc::new(SqlitePredictionLog::from_pool(pool)),
        Err(e) => {
            warn!(
                "Database {} unavailable ({}), predictions will not be recorded until it is reachable",
                config.database_path.display(),
                e
            );
            Arc::new(SqlitePredictionLog::open(&config.database_path))
        }
    };

    let selector = Arc::new(SongSelector::new(
        catalog,
        Arc::clone(&aliases),
        config.song_limit,
    ));
    let state = AppState::new(classifier, aliases, selector, prediction_log);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_addr, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("moodtunes-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
