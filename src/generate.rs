//! # Stamp Generation
//!
//! Renders the final stamp: the stored placement applied to the stamp image
//! with the real text, optionally scaled to a target width. Uses the same
//! centering and font resolution as the editor preview, without the
//! crosshair.

use image::{imageops::FilterType, DynamicImage, RgbaImage};
use std::path::Path;
use tracing::debug;

use crate::error::StampError;
use crate::placement::{ConfigStore, Placement, PlacementConfig, DEFAULT_SIZE};
use crate::render::{self, font::FontBook, surface::Surface, Overlay};
use crate::stamps;

/// Largest output area in pixels a resize may produce.
pub const MAX_OUTPUT_PIXELS: u64 = 40_000_000;

/// Placement scaled by `factor`, truncating like integer pixel math.
fn scaled_placement(config: &PlacementConfig, factor: f64) -> Placement {
    let scale = |v: i64| (v as f64 * factor) as i64;
    let resolved = config.resolve();
    Placement {
        x: scale(config.x().unwrap_or(0)),
        y: scale(config.y().unwrap_or(0)),
        font: resolved.font,
        size: scale(config.size().unwrap_or(DEFAULT_SIZE)),
        color: resolved.color,
    }
}

/// Draw `text` on `image` according to `config`.
///
/// A `target_width` of `None` or `Some(0)` keeps the original size. Otherwise
/// the image is resized to that width, keeping the aspect ratio, and the
/// coordinates and font size are scaled by the same factor. A target whose
/// area exceeds [`MAX_OUTPUT_PIXELS`] is rejected with
/// [`StampError::OutputTooLarge`] before anything is allocated.
pub fn generate_stamp_image(
    image: DynamicImage,
    config: &PlacementConfig,
    text: &str,
    target_width: Option<u32>,
    fonts: &mut FontBook,
) -> Result<RgbaImage, StampError> {
    let mut image = image.to_rgba8();
    let mut factor = 1.0f64;

    if let Some(target) = target_width.filter(|w| *w > 0) {
        let (width, height) = image.dimensions();
        if width == 0 {
            return Err(StampError::Image("Stamp image has zero width".to_string()));
        }
        factor = target as f64 / width as f64;
        let new_height = ((height as f64 * factor) as u64).max(1);
        if u64::from(target).saturating_mul(new_height) > MAX_OUTPUT_PIXELS {
            return Err(StampError::OutputTooLarge(format!(
                "{}x{} exceeds {} pixels",
                target, new_height, MAX_OUTPUT_PIXELS
            )));
        }
        let new_height = new_height as u32;
        image = image::imageops::resize(&image, target, new_height, FilterType::Lanczos3);
    }

    let placement = scaled_placement(config, factor);
    debug!(
        x = placement.x,
        y = placement.y,
        size = placement.size,
        font = %placement.font,
        factor,
        "Generating stamp"
    );

    let (width, height) = image.dimensions();
    let mut surface = Surface::new(width, height);
    let overlay = Overlay::new(&placement, text, false);
    render::render_overlay(&mut surface, &image, &overlay, fonts)?;
    Ok(surface.into_image())
}

/// Look up `stamp` in `store`, load it from `stamp_dir` and generate.
pub fn generate_from_dir(
    stamp_dir: &Path,
    store: &ConfigStore,
    stamp: &str,
    text: &str,
    target_width: Option<u32>,
    fonts: &mut FontBook,
) -> Result<RgbaImage, StampError> {
    let config = store
        .get(stamp)
        .ok_or_else(|| StampError::NotConfigured(stamp.to_string()))?;

    let path = stamps::stamp_path(stamp_dir, stamp)
        .filter(|path| path.is_file())
        .ok_or_else(|| StampError::ImageNotFound(stamp.to_string()))?;
    let image = image::open(&path)?;

    generate_stamp_image(image, config, text, target_width, fonts)
}
