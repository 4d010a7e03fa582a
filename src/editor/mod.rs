//! # Calibration Editor
//!
//! Application state for placing overlay text on stamps.
//!
//! The editor is a plain struct driven by [`Message`]s. [`Editor::update`]
//! applies one message, re-renders the surface when something visible changed,
//! and may return an [`Effect`]: a backend request the owner should perform
//! and answer with another message. Nothing here blocks or touches the
//! network, so the whole loop can be driven synchronously in tests.
//!
//! ```
//! use image::RgbaImage;
//! use stampcal::editor::{Editor, Effect, Field, Message};
//! use stampcal::placement::ConfigStore;
//! use stampcal::render::font::FontBook;
//!
//! let mut editor = Editor::new(FontBook::bitmap_only());
//! assert_eq!(editor.update(Message::Initialize), Some(Effect::FetchInitial));
//!
//! let effect = editor.update(Message::Initialized(Ok((
//!     vec!["a.png".to_string()],
//!     ConfigStore::new(),
//! ))));
//! assert_eq!(effect, Some(Effect::LoadImage("a.png".to_string())));
//!
//! editor.update(Message::ImageLoaded {
//!     name: "a.png".to_string(),
//!     result: Ok(RgbaImage::new(200, 100)),
//! });
//! assert_eq!(editor.form().x, "100");
//!
//! editor.update(Message::EditField(Field::X, "40".to_string()));
//! assert_eq!(editor.store().get("a.png").unwrap().x(), Some(40));
//! ```

pub mod command;
pub mod form;
pub mod status;

pub use command::Command;
pub use form::{Field, Form};
pub use status::{StatusKind, StatusMessage};

use image::RgbaImage;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::backend::SaveAck;
use crate::error::StampError;
use crate::placement::{ConfigStore, Placement, StampName};
use crate::render::{self, font::FontBook, surface::Surface, Overlay};

/// Overall tool lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
}

/// Save action lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving,
    Succeeded,
    Failed,
}

/// Inputs to the editor: user actions and backend results.
#[derive(Debug)]
pub enum Message {
    /// Start up: fetch stamps and configuration.
    Initialize,
    /// Result of [`Effect::FetchInitial`].
    Initialized(Result<(Vec<StampName>, ConfigStore), StampError>),
    /// Choose the stamp to edit.
    SelectStamp(StampName),
    /// Result of [`Effect::LoadImage`].
    ImageLoaded {
        name: StampName,
        result: Result<RgbaImage, StampError>,
    },
    /// A form input changed.
    EditField(Field, String),
    /// Pointer press on the surface, in on-screen pixels relative to its
    /// top-left corner, with the surface's on-screen size.
    ClickPlace {
        pixel_x: f64,
        pixel_y: f64,
        display_width: f64,
        display_height: f64,
    },
    /// Persist the whole configuration.
    Save,
    /// Result of [`Effect::Submit`].
    SaveFinished(Result<SaveAck, StampError>),
}

/// Backend work requested by the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the stamp list, then the configuration.
    FetchInitial,
    /// Fetch and decode the image of a stamp.
    LoadImage(StampName),
    /// Submit the full configuration.
    Submit(ConfigStore),
}

/// The calibration editor state.
#[derive(Debug)]
pub struct Editor {
    fonts: FontBook,
    phase: Phase,
    stamps: Vec<StampName>,
    store: ConfigStore,
    selected: Option<StampName>,
    form: Form,
    image: Option<RgbaImage>,
    surface: Surface,
    save_state: SaveState,
    status: Option<StatusMessage>,
}

impl Editor {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            phase: Phase::Uninitialized,
            stamps: Vec::new(),
            store: ConfigStore::new(),
            selected: None,
            form: Form::default(),
            image: None,
            surface: Surface::default(),
            save_state: SaveState::Idle,
            status: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stamps(&self) -> &[StampName] {
        &self.stamps
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// True once the selected stamp's image is loaded.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn save_state(&self) -> SaveState {
        self.save_state
    }

    /// Status line as of now on the tokio clock.
    pub fn status_text(&self) -> &str {
        self.status_text_at(Instant::now())
    }

    /// Status line as of `now`; empty once a self-clearing message expired.
    pub fn status_text_at(&self, now: Instant) -> &str {
        match &self.status {
            Some(message) if message.is_visible_at(now) => message.text,
            _ => "",
        }
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Apply one message.
    pub fn update(&mut self, message: Message) -> Option<Effect> {
        match message {
            Message::Initialize => {
                self.phase = Phase::Loading;
                Some(Effect::FetchInitial)
            }
            Message::Initialized(result) => self.on_initialized(result),
            Message::SelectStamp(name) => self.select_stamp(name),
            Message::ImageLoaded { name, result } => {
                self.on_image_loaded(name, result);
                None
            }
            Message::EditField(field, value) => {
                self.edit_field(field, value);
                None
            }
            Message::ClickPlace {
                pixel_x,
                pixel_y,
                display_width,
                display_height,
            } => {
                self.click_place(pixel_x, pixel_y, display_width, display_height);
                None
            }
            Message::Save => Some(self.save()),
            Message::SaveFinished(result) => {
                self.on_save_finished(result);
                None
            }
        }
    }

    fn on_initialized(
        &mut self,
        result: Result<(Vec<StampName>, ConfigStore), StampError>,
    ) -> Option<Effect> {
        self.phase = Phase::Ready;

        let (stamps, store) = match result {
            Ok(loaded) => loaded,
            Err(e) => {
                // No user-visible message: the editor just stays empty
                warn!(error = %e, "Failed to load stamps or configuration");
                return None;
            }
        };

        info!(stamps = stamps.len(), configured = store.len(), "Loaded stamps and configuration");
        self.stamps = stamps;
        self.store = store;

        let first = self.stamps.first()?.clone();
        self.select_stamp(first)
    }

    fn select_stamp(&mut self, name: StampName) -> Option<Effect> {
        if !self.stamps.contains(&name) {
            warn!(stamp = %name, "Ignoring selection of unknown stamp");
            return None;
        }

        debug!(stamp = %name, "Selecting stamp");
        self.selected = Some(name.clone());
        Some(Effect::LoadImage(name))
    }

    fn on_image_loaded(&mut self, name: StampName, result: Result<RgbaImage, StampError>) {
        if self.selected.as_deref() != Some(name.as_str()) {
            debug!(stamp = %name, "Dropping image for a stamp that is no longer selected");
            return;
        }

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                warn!(stamp = %name, error = %e, "Failed to load stamp image");
                return;
            }
        };

        let (width, height) = image.dimensions();
        self.surface.resize(width, height);

        let placement = match self.store.get(&name) {
            Some(stored) => stored.resolve(),
            None => Placement::centered(width, height),
        };
        self.form.apply(&placement);
        self.image = Some(image);

        debug!(stamp = %name, width, height, x = placement.x, y = placement.y, "Stamp loaded");
        self.render();
    }

    fn edit_field(&mut self, field: Field, value: String) {
        self.form.set(field, value);
        self.write_through();
        self.render();
    }

    fn click_place(&mut self, pixel_x: f64, pixel_y: f64, display_width: f64, display_height: f64) {
        if self.image.is_none() || display_width <= 0.0 || display_height <= 0.0 {
            return;
        }

        let scale_x = self.surface.width() as f64 / display_width;
        let scale_y = self.surface.height() as f64 / display_height;
        let x = round_half_up(pixel_x * scale_x);
        let y = round_half_up(pixel_y * scale_y);

        self.form.set(Field::X, x.to_string());
        self.form.set(Field::Y, y.to_string());
        self.write_through();
        self.render();
    }

    fn save(&mut self) -> Effect {
        // Covers any edit that did not write through
        self.write_through();
        self.save_state = SaveState::Saving;
        info!(stamps = self.store.len(), "Saving configuration");
        Effect::Submit(self.store.clone())
    }

    fn on_save_finished(&mut self, result: Result<SaveAck, StampError>) {
        match result {
            Ok(ack) if ack.is_success() => {
                info!("Configuration saved");
                self.save_state = SaveState::Succeeded;
                self.status = Some(StatusMessage::saved(Instant::now()));
            }
            Ok(ack) => {
                warn!(status = %ack.status, "Backend refused configuration");
                self.save_state = SaveState::Failed;
                self.status = Some(StatusMessage::save_failed());
            }
            Err(e) => {
                warn!(error = %e, "Failed to save configuration");
                self.save_state = SaveState::Failed;
                self.status = Some(StatusMessage::save_failed());
            }
        }
    }

    /// Copy the form's placement into the selected stamp's record.
    fn write_through(&mut self) {
        if let Some(name) = &self.selected {
            self.store.write(name, &self.form.placement());
        }
    }

    fn render(&mut self) {
        let Some(image) = &self.image else {
            return;
        };

        let overlay = Overlay::new(&self.form.placement(), &self.form.preview_text, true);
        if let Err(e) = render::render_overlay(&mut self.surface, image, &overlay, &mut self.fonts) {
            warn!(error = %e, "Render failed");
        }
    }
}

/// Round to the nearest integer, halves toward positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
