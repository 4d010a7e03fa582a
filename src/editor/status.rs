//! Save status message shown to the user.

use std::time::Duration;
use tokio::time::Instant;

/// How long the success message stays visible.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

pub const SAVED_TEXT: &str = "Configuration Saved!";
pub const SAVE_ERROR_TEXT: &str = "Error saving configuration.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// A status line, optionally expiring.
///
/// The expiry belongs to the message itself: replacing a success message with
/// an error drops the pending clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: &'static str,
    pub kind: StatusKind,
    expires_at: Option<Instant>,
}

impl StatusMessage {
    /// Success message that clears itself after [`SUCCESS_DISPLAY`].
    pub fn saved(now: Instant) -> Self {
        Self {
            text: SAVED_TEXT,
            kind: StatusKind::Success,
            expires_at: Some(now + SUCCESS_DISPLAY),
        }
    }

    /// Error message that stays until replaced.
    pub fn save_failed() -> Self {
        Self {
            text: SAVE_ERROR_TEXT,
            kind: StatusKind::Error,
            expires_at: None,
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}
