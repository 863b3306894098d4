use anyhow::{Context, Result};
use paysnap_ocr::{Extractor, OcrBackend, ReceiptPipeline};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod routes;
mod state;

use config::{AppConfig, OcrConfig};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.server.log_filter);

    let db = paysnap_storage::create_db(&config.database.path)
        .await
        .with_context(|| format!("failed to open database {}", config.database.path.display()))?;

    let extractor = Extractor::new(config.extraction.clone())?;
    let pipeline = ReceiptPipeline::new(build_recognizer(&config.ocr), extractor)
        .with_max_dimension(config.ocr.max_dimension);

    let state = Arc::new(AppState { db, pipeline });
    let app = routes::router(state, config.server.body_limit_bytes);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    tracing::info!(addr = %config.server.bind, db = %config.database.path.display(), "paysnap server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(feature = "tesseract")]
fn build_recognizer(config: &OcrConfig) -> Box<dyn OcrBackend> {
    use paysnap_ocr::recognizer::tesseract_backend::TesseractRecognizer;

    tracing::info!(language = %config.language, "using Tesseract OCR backend");
    Box::new(TesseractRecognizer::new(config.tessdata_path.clone(), &config.language))
}

#[cfg(not(feature = "tesseract"))]
fn build_recognizer(_config: &OcrConfig) -> Box<dyn OcrBackend> {
    tracing::warn!("built without the `tesseract` feature; /upload will answer 503, /extract still works");
    Box::new(paysnap_ocr::UnavailableRecognizer)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
