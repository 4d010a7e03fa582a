//! # Rendering Module
//!
//! Draws stamp images with their text overlay.
//!
//! ## Modules
//!
//! - [`color`]: CSS color parsing
//! - [`font`]: Font family resolution (TrueType with a bitmap fallback)
//! - [`surface`]: Canvas-like RGBA drawing surface and crosshair
//! - [`text`]: Centered text rasterization
//!
//! ## Usage Example
//!
//! ```
//! use image::RgbaImage;
//! use stampcal::render::{self, font::FontBook, surface::Surface, Overlay};
//!
//! let stamp = RgbaImage::new(200, 100);
//! let mut surface = Surface::new(200, 100);
//! let mut fonts = FontBook::bitmap_only();
//!
//! let overlay = Overlay {
//!     text: "A-123".to_string(),
//!     x: 100,
//!     y: 50,
//!     font: "Arial".to_string(),
//!     size: 24,
//!     color: "#000000".to_string(),
//!     crosshair: true,
//! };
//! render::render_overlay(&mut surface, &stamp, &overlay, &mut fonts)?;
//! # Ok::<(), stampcal::StampError>(())
//! ```

pub mod color;
pub mod font;
pub mod surface;
pub mod text;

use image::RgbaImage;
use std::io::Cursor;

use crate::error::StampError;
use crate::placement::Placement;
use color::Color;
use font::FontBook;
use surface::Surface;

/// Everything needed to draw the text layer on a stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub text: String,
    pub x: i64,
    pub y: i64,
    pub font: String,
    pub size: i64,
    pub color: String,
    /// Draw the placement crosshair (editor preview only).
    pub crosshair: bool,
}

impl Overlay {
    pub fn new(placement: &Placement, text: &str, crosshair: bool) -> Self {
        Self {
            text: text.to_string(),
            x: placement.x,
            y: placement.y,
            font: placement.font.clone(),
            size: placement.size,
            color: placement.color.clone(),
            crosshair,
        }
    }
}

/// Clear the surface, draw the image at the origin, then the text and
/// optional crosshair centered on the overlay point.
pub fn render_overlay(
    surface: &mut Surface,
    image: &RgbaImage,
    overlay: &Overlay,
    fonts: &mut FontBook,
) -> Result<(), StampError> {
    surface.clear();
    surface.draw_image(image);

    let face = fonts.resolve(&overlay.font);
    text::draw_text_centered(
        surface.pixels_mut(),
        &face,
        &overlay.text,
        overlay.size as f32,
        Color::parse_or_black(&overlay.color),
        overlay.x as f32,
        overlay.y as f32,
    )?;

    if overlay.crosshair {
        surface.stroke_crosshair(overlay.x, overlay.y, Color::CROSSHAIR);
    }

    Ok(())
}

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, StampError> {
    let mut png_bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .map_err(|e| StampError::Image(format!("PNG encoding failed: {}", e)))?;
    Ok(png_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn overlay(text: &str, crosshair: bool) -> Overlay {
        Overlay {
            text: text.to_string(),
            x: 50,
            y: 30,
            font: "Arial".to_string(),
            size: 24,
            color: "#ff0000".to_string(),
            crosshair,
        }
    }

    #[test]
    fn test_render_draws_image_text_and_crosshair() {
        let stamp = RgbaImage::from_pixel(100, 60, Rgba([255, 255, 255, 255]));
        let mut surface = Surface::new(100, 60);
        let mut fonts = FontBook::bitmap_only();

        render_overlay(&mut surface, &stamp, &overlay("8", true), &mut fonts).unwrap();

        let pixels = surface.pixels();
        assert_eq!(pixels.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert!(pixels.pixels().any(|p| p.0 == [255, 0, 0, 255]), "red text expected");
        // Crosshair arm end, well outside a single 12px glyph
        assert_eq!(pixels.get_pixel(40, 30)[1], 255);
        assert!(pixels.get_pixel(40, 30)[0] < 255);
    }

    #[test]
    fn test_render_without_crosshair() {
        let stamp = RgbaImage::from_pixel(100, 60, Rgba([255, 255, 255, 255]));
        let mut surface = Surface::new(100, 60);
        let mut fonts = FontBook::bitmap_only();

        render_overlay(&mut surface, &stamp, &overlay("", false), &mut fonts).unwrap();
        assert!(surface.pixels().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_rerender_clears_previous_frame() {
        let stamp = RgbaImage::from_pixel(100, 60, Rgba([255, 255, 255, 255]));
        let mut surface = Surface::new(100, 60);
        let mut fonts = FontBook::bitmap_only();

        render_overlay(&mut surface, &stamp, &overlay("", true), &mut fonts).unwrap();
        let mut moved = overlay("", true);
        moved.x = 20;
        moved.y = 10;
        render_overlay(&mut surface, &stamp, &moved, &mut fonts).unwrap();

        assert_eq!(surface.pixels().get_pixel(60, 30).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_encode_png_decodes() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        let bytes = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
    }
}
