//! Stamp image serving.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::super::state::AppState;
use crate::stamps;

/// GET /images/*filename - Raw stamp image bytes.
pub async fn serve(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    let Some(path) = stamps::stamp_path(&state.config.stamp_dir, &filename) else {
        return (StatusCode::NOT_FOUND, "Image not found").into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path)
                .first_or_octet_stream()
                .to_string();
            ([(header::CONTENT_TYPE, mime)], bytes).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Image not found").into_response(),
    }
}
