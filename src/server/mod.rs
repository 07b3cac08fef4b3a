//! Web server for uploading and browsing processed files.
//!
//! Provides:
//! - An upload page with drag-and-drop
//! - `POST /upload/` running the ingestion pipeline
//! - Listing and per-file JSON endpoints over the record store

mod assets;
mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;

use crate::config::Settings;
use crate::services::FileProcessor;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub processor: FileProcessor,
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(processor: FileProcessor, max_upload_bytes: usize) -> Self {
        Self {
            processor,
            max_upload_bytes,
        }
    }

    /// Build state from settings, migrating the database first.
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        settings.ensure_directories()?;
        let ctx = settings.create_db_context()?;

        let applied = ctx.migrate().await?;
        if !applied.is_empty() {
            tracing::info!("Applied {} migration(s): {}", applied.len(), applied.join(", "));
        }

        Ok(Self::new(
            settings.file_processor(&ctx),
            settings.max_upload_bytes,
        ))
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::from_settings(settings).await?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
