//! HTTP handlers for the server.

pub mod config;
pub mod generate;
pub mod images;
pub mod stamps;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// JSON error body used by the API handlers.
pub(crate) fn json_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}
