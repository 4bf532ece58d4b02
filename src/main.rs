//! Bill Page Bot
//!
//! Telegram bot that answers a consumer number with that consumer's page
//! from the shared bill PDF.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bill_page_bot::config::Config;
use bill_page_bot::document::{DocumentProvider, HttpFetcher};
use bill_page_bot::handler::RequestHandler;
use bill_page_bot::mapping::MappingStore;
use bill_page_bot::telegram::{BotClient, Dispatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG from it applies
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bill_page_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Cannot start without configuration")?;

    tracing::info!("Starting Bill Page Bot v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Mapping file: {}", config.mapping.path.display());
    tracing::info!("Bill PDF: {}", config.document.path.display());

    // Mapping is read once; a broken table leaves the bot answering "not found"
    let mapping = match MappingStore::load(&config.mapping.path, config.mapping.mode) {
        Ok((store, _)) => store,
        Err(e) => {
            tracing::error!(
                "Failed to load mapping from {}: {}. Every lookup will report not found",
                config.mapping.path.display(),
                e
            );
            MappingStore::empty()
        }
    };

    let fetcher = HttpFetcher::new(Duration::from_secs(config.document.fetch_timeout_secs))
        .context("Failed to build HTTP client")?;
    let documents = DocumentProvider::new(
        config.document.path.clone(),
        config.document.url.clone(),
        Arc::new(fetcher),
    )
    .with_open_timeout(Duration::from_secs(config.document.open_timeout_secs));

    // One-time download before any request is served
    let status = documents.ensure_local().await;
    tracing::info!("Reference document status: {:?}", status);

    let handler = RequestHandler::new(Arc::new(mapping), Arc::new(documents))
        .with_extract_timeout(Duration::from_secs(config.document.extract_timeout_secs))
        .with_max_concurrent(config.document.max_concurrent);

    let bot = BotClient::new(
        &config.telegram.api_url,
        &config.telegram.token,
        config.telegram.poll_timeout_secs,
    )
    .context("Failed to build Telegram client")?;

    Dispatcher::new(bot, Arc::new(handler), config.telegram.poll_timeout_secs)
        .run(shutdown_signal())
        .await;

    tracing::info!("Bot shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
