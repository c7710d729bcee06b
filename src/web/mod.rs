//! Web layer module
//!
//! Serves the published catalog, the cached logos and the playback proxy
//! for streams that need server-side request headers.

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::utils::HttpFetcher;

pub mod directory;
pub mod handlers;
pub mod responses;

pub use directory::ChannelDirectory;

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(host: &str, port: u16, state: AppState, logo_directory: PathBuf) -> Result<Self> {
        let addr: SocketAddr = format!("{host}:{port}").parse()?;
        let app = create_router(state, logo_directory);
        Ok(Self { app, addr })
    }

    /// Start the web server and run until ctrl-c
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Listening on http://{}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Build the router with all routes and middleware
pub fn create_router(state: AppState, logo_directory: PathBuf) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/channels", get(handlers::list_channels))
        .route("/channels/{file}", get(handlers::get_channel))
        .route("/stream/{id}", get(handlers::missing_stream_action))
        .route("/stream/{id}/{action}", get(handlers::stream))
        .nest_service("/logos", ServeDir::new(logo_directory))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub channels: Arc<ChannelDirectory>,
    pub fetcher: Arc<dyn HttpFetcher>,
}

impl AppState {
    pub fn new(channels: ChannelDirectory, fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self {
            channels: Arc::new(channels),
            fetcher,
        }
    }
}
