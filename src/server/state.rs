//! Server state and configuration.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Mutex as AsyncMutex;

use crate::error::StampError;
use crate::render::font::FontBook;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:5000")
    pub listen_addr: String,
    /// Directory holding the stamp images
    pub stamp_dir: PathBuf,
    /// JSON file holding the placement configuration
    pub config_file: PathBuf,
    /// Directory searched for TrueType fonts
    pub font_dir: Option<PathBuf>,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Serializes reads and writes of the config file.
    pub config_lock: AsyncMutex<()>,
    fonts: Mutex<FontBook>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let fonts = FontBook::new(config.font_dir.clone());
        Self {
            config,
            config_lock: AsyncMutex::new(()),
            fonts: Mutex::new(fonts),
        }
    }

    /// Lock the shared font cache (blocking; use from blocking tasks).
    pub fn fonts(&self) -> Result<MutexGuard<'_, FontBook>, StampError> {
        self.fonts
            .lock()
            .map_err(|_| StampError::Font("Font cache lock poisoned".to_string()))
    }
}
