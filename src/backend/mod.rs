//! # Backend Boundary
//!
//! The editor never talks to the network directly. It asks its session for
//! effects, and the session performs them through a [`Backend`].
//!
//! [`HttpBackend`] is the real implementation against the stamp server; tests
//! use in-memory implementations.

mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::StampError;
use crate::placement::ConfigStore;

/// Status value the server returns when a save was persisted.
pub const STATUS_SUCCESS: &str = "success";

/// Acknowledgment body of `POST /api/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAck {
    #[serde(default)]
    pub status: String,
}

impl SaveAck {
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Operations the calibration editor needs from its backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/stamps`: names of the available stamp images.
    async fn list_stamps(&self) -> Result<Vec<String>, StampError>;

    /// `GET /api/config`: the stored configuration.
    async fn load_config(&self) -> Result<ConfigStore, StampError>;

    /// `POST /api/config`: replace the stored configuration wholesale.
    ///
    /// Non-2xx responses are errors; a 2xx response with a non-success status
    /// is returned as-is for the caller to judge.
    async fn save_config(&self, store: &ConfigStore) -> Result<SaveAck, StampError>;

    /// `GET /images/{name}`: the decoded stamp image.
    async fn load_image(&self, name: &str) -> Result<RgbaImage, StampError>;
}
