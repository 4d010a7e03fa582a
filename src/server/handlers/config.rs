//! Placement configuration API handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::super::state::AppState;
use crate::backend::STATUS_SUCCESS;
use crate::placement::file;

fn error_body(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "status": "error", "error": message.into() })),
    )
}

/// GET /api/config - The stored configuration, `{}` if there is none.
pub async fn get(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let _guard = state.config_lock.lock().await;
    let path = state.config.config_file.clone();

    let result = tokio::task::spawn_blocking(move || file::read_value(&path))
        .await
        .map_err(|e| error_body(StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?;

    result.map(Json).map_err(|e| {
        warn!(error = %e, "Failed to read config file");
        error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

/// POST /api/config - Replace the stored configuration wholesale.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let stamps = match &body {
        Value::Object(map) => map.len(),
        _ => {
            return Err(error_body(
                StatusCode::BAD_REQUEST,
                "Configuration must be a JSON object",
            ));
        }
    };

    let _guard = state.config_lock.lock().await;
    let path = state.config.config_file.clone();

    let result = tokio::task::spawn_blocking(move || file::write_value(&path, &body))
        .await
        .map_err(|e| error_body(StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?;

    match result {
        Ok(()) => {
            info!(stamps, "Configuration saved");
            Ok(Json(json!({ "status": STATUS_SUCCESS })))
        }
        Err(e) => {
            warn!(error = %e, "Failed to write config file");
            Err(error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
