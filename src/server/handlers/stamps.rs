//! Stamp listing API handler.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::super::state::AppState;
use super::json_error;
use crate::stamps;

/// GET /api/stamps - Names of the stamp images.
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<Value>)> {
    let dir = state.config.stamp_dir.clone();
    let result = tokio::task::spawn_blocking(move || stamps::list_stamps(&dir))
        .await
        .map_err(|e| json_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?;

    match result {
        Ok(names) => Ok(Json(names)),
        Err(e) => {
            warn!(error = %e, "Failed to list stamps");
            Err(json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
