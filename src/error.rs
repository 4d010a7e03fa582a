//! # Error Types
//!
//! This module defines error types used throughout the stampcal library.

use thiserror::Error;

/// Main error type for stampcal operations
#[derive(Debug, Error)]
pub enum StampError {
    /// Network-level errors talking to the backend
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered, but not with something usable
    #[error("Backend error: {0}")]
    Backend(String),

    /// Stamp has no stored placement
    #[error("Stamp not configured: {0}")]
    NotConfigured(String),

    /// Stamp image file is missing
    #[error("Image not found: {0}")]
    ImageNotFound(String),

    /// Requested output image is too large to render
    #[error("Output too large: {0}")]
    OutputTooLarge(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Font loading or rasterization error
    #[error("Font error: {0}")]
    Font(String),

    /// Invalid configuration or command input
    #[error("Config error: {0}")]
    Config(String),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for StampError {
    fn from(e: image::ImageError) -> Self {
        StampError::Image(e.to_string())
    }
}
