//! Stamp generation API handler.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use super::super::state::AppState;
use super::json_error;
use crate::{
    error::StampError,
    generate,
    placement::{file, lenient},
    render,
};

/// Request body for the generate endpoint.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Stamp file name
    #[serde(default)]
    pub stamp: Option<String>,
    /// Text to draw, usually an approval number (string or number)
    #[serde(default)]
    pub number: Option<Value>,
    /// Optional output width; height follows the aspect ratio
    #[serde(default)]
    pub width: Option<u32>,
}

/// POST /generate - Render a configured stamp with the given text as PNG.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let stamp = req.stamp.filter(|s| !s.is_empty());
    let number = req
        .number
        .as_ref()
        .and_then(lenient::text_from_value)
        .filter(|s| !s.is_empty());

    let (Some(stamp), Some(number)) = (stamp, number) else {
        return Err(json_error(StatusCode::BAD_REQUEST, "Missing data"));
    };
    let width = req.width;

    let store = {
        let _guard = state.config_lock.lock().await;
        let path = state.config.config_file.clone();
        tokio::task::spawn_blocking(move || file::load_store(&path))
            .await
            .map_err(|e| json_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?
            .map_err(|e| json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    };

    // Move CPU-intensive work to blocking thread pool
    let worker_state = Arc::clone(&state);
    let worker_stamp = stamp.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut fonts = worker_state.fonts()?;
        let image = generate::generate_from_dir(
            &worker_state.config.stamp_dir,
            &store,
            &worker_stamp,
            &number,
            width,
            &mut fonts,
        )?;
        render::encode_png(&image)
    })
    .await
    .map_err(|e| json_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?;

    match result {
        Ok(png_bytes) => {
            info!(stamp = %stamp, width = ?width, bytes = png_bytes.len(), "Generated stamp");
            Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
        }
        Err(StampError::NotConfigured(_)) => {
            Err(json_error(StatusCode::BAD_REQUEST, "Stamp not configured"))
        }
        Err(StampError::ImageNotFound(_)) => {
            Err(json_error(StatusCode::NOT_FOUND, "Image not found"))
        }
        Err(StampError::OutputTooLarge(detail)) => {
            warn!(stamp = %stamp, width = ?width, %detail, "Rejected oversized stamp");
            Err(json_error(StatusCode::BAD_REQUEST, "Requested width is too large"))
        }
        Err(e) => {
            warn!(stamp = %stamp, error = %e, "Stamp generation failed");
            Err(json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
