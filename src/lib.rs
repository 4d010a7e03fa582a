//! # Stampcal - Stamp Text Calibration
//!
//! Stampcal places overlay text on stamp images. It provides:
//!
//! - **Calibration editor**: state and message dispatch for choosing a stamp,
//!   positioning text by coordinates or clicks, and styling it
//! - **Rendering**: canvas-like surface with centered text and a crosshair
//! - **Backend client**: HTTP access to stamps and the stored configuration
//! - **Server**: the backend itself, plus finished-stamp generation
//!
//! ## Quick Start
//!
//! ```no_run
//! use stampcal::{
//!     backend::HttpBackend,
//!     editor::{Editor, Field, Message},
//!     render::font::FontBook,
//!     session::Session,
//! };
//!
//! # async fn example() -> Result<(), stampcal::StampError> {
//! let backend = HttpBackend::new("http://127.0.0.1:5000")?;
//! let mut session = Session::new(Editor::new(FontBook::bitmap_only()), backend);
//!
//! // Load stamps and configuration, render the first stamp
//! session.initialize().await;
//!
//! // Move the text and save everything
//! session.dispatch(Message::EditField(Field::X, "120".to_string()));
//! session.dispatch(Message::Save);
//! session.settle().await;
//!
//! println!("{}", session.editor().status_text());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`placement`] | Placement records and the config store |
//! | [`editor`] | Calibration editor state machine |
//! | [`render`] | Surface, text and crosshair drawing |
//! | [`backend`] | Backend trait and HTTP client |
//! | [`session`] | Async runtime for editor effects |
//! | [`generate`] | Finished-stamp rendering |
//! | [`server`] | HTTP backend |
//! | [`error`] | Error types |

pub mod backend;
pub mod editor;
pub mod error;
pub mod generate;
pub mod placement;
pub mod render;
pub mod server;
pub mod session;
pub mod stamps;

// Re-exports for convenience
pub use error::StampError;
pub use placement::{ConfigStore, PlacementConfig};
