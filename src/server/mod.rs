pub mod handlers;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::image_check::{AttributeDecoder, ImageCrateDecoder, TransparencyPolicy};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;

/// Effective settings of the HTTP service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    /// Async worker threads, 0 = one per CPU core
    pub workers: usize,
    pub cors: bool,
    pub transparency: TransparencyPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            workers: 0,
            cors: true,
            transparency: TransparencyPolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn worker_threads(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub decoder: Arc<dyn AttributeDecoder>,
}

impl AppState {
    pub fn new(decoder: Arc<dyn AttributeDecoder>) -> Self {
        Self { decoder }
    }
}

/// Build the application router
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let app = Router::new()
        .route("/", get(handlers::root))
        .route("/check-image", post(handlers::check_image))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state);

    if config.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::new(Arc::new(ImageCrateDecoder::new(config.transparency)));
    let app = router(state, &config);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    log::info!(
        "Listening on http://{} (max upload {} MiB, transparency policy: {}, cors: {})",
        listener.local_addr().context("Failed to read bound address")?,
        config.max_upload_bytes / (1024 * 1024),
        config.transparency.name(),
        config.cors
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated with an error")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Shutdown requested, draining connections"),
        Err(e) => {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.cors);
        assert_eq!(config.transparency, TransparencyPolicy::FullyTransparent);
    }

    #[test]
    fn test_worker_threads() {
        let auto = ServerConfig::default();
        assert_eq!(auto.worker_threads(), num_cpus::get());

        let fixed = ServerConfig {
            workers: 3,
            ..Default::default()
        };
        assert_eq!(fixed.worker_threads(), 3);
    }
}
