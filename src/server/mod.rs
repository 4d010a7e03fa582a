//! # Stamp Server
//!
//! The backend the calibration editor talks to: lists stamp images, serves
//! them, stores the placement configuration, and renders finished stamps.
//!
//! ## Usage
//!
//! ```bash
//! stampcal serve --port 5000 --stamp-dir stamp --config-file stamp_config.json
//! ```
//!
//! ## Routes
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /api/stamps` | JSON array of stamp file names |
//! | `GET /api/config` | Stored configuration (`{}` if none) |
//! | `POST /api/config` | Replace the stored configuration |
//! | `GET /images/*filename` | Stamp image bytes |
//! | `POST /generate` | PNG of a stamp with text drawn on it |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::StampError;
use crate::placement::file;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Editor API
        .route("/api/stamps", get(handlers::stamps::list))
        .route(
            "/api/config",
            get(handlers::config::get).post(handlers::config::save),
        )
        // Stamp images
        .route("/images/*filename", get(handlers::images::serve))
        // Generation API
        .route("/generate", post(handlers::generate::generate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// Creates an empty config file first if none exists.
///
/// ## Example
///
/// ```no_run
/// use stampcal::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), stampcal::StampError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:5000".to_string(),
///     stamp_dir: "stamp".into(),
///     config_file: "stamp_config.json".into(),
///     font_dir: None,
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), StampError> {
    file::ensure_exists(&config.config_file)?;

    let app = router(Arc::new(AppState::new(config.clone())));

    info!(
        listen = %config.listen_addr,
        stamp_dir = %config.stamp_dir.display(),
        config_file = %config.config_file.display(),
        font_dir = ?config.font_dir,
        "Stamp server starting"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            StampError::Config(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app).await?;

    Ok(())
}
