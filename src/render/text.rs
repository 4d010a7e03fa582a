//! Centered text rasterization.
//!
//! Text is centered horizontally and vertically on a point, the way a canvas
//! draws with `textAlign = "center"` and `textBaseline = "middle"`.

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::RgbaImage;
use spleen_font::{PSF2Font, FONT_12X24};

use super::color::Color;
use super::font::Typeface;
use super::surface::blend_at;
use crate::error::StampError;

/// Largest font size that is rasterized; bigger sizes are clamped.
pub const MAX_TEXT_SIZE: f32 = 2048.0;

const SPLEEN_WIDTH: usize = 12;
const SPLEEN_HEIGHT: usize = 24;

/// Draw `text` centered on `(cx, cy)`.
///
/// `size` is the em size in pixels. Sizes of zero or less draw nothing.
pub fn draw_text_centered(
    target: &mut RgbaImage,
    face: &Typeface,
    text: &str,
    size: f32,
    color: Color,
    cx: f32,
    cy: f32,
) -> Result<(), StampError> {
    if text.is_empty() || size <= 0.0 || color.a == 0 {
        return Ok(());
    }
    let size = size.min(MAX_TEXT_SIZE);

    match face {
        Typeface::TrueType(font) => {
            draw_truetype(target, font, text, size, color, cx, cy);
            Ok(())
        }
        Typeface::Bitmap => draw_bitmap(target, text, size, color, cx, cy),
    }
}

/// Pixel scale for an em size. ab_glyph scales by ascent-descent height,
/// CSS and TrueType sizes are per em.
fn em_scale(font: &FontArc, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units_per_em) => PxScale::from(size * font.height_unscaled() / units_per_em),
        None => PxScale::from(size),
    }
}

fn draw_truetype(
    target: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    size: f32,
    color: Color,
    cx: f32,
    cy: f32,
) {
    let scale = em_scale(font, size);
    let scaled = font.as_scaled(scale);

    // Layout: compute glyph positions
    let mut glyphs = Vec::new();
    let mut caret_x = 0.0f32;
    let mut previous: Option<GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret_x += scaled.kern(prev, glyph_id);
        }
        glyphs.push((glyph_id, caret_x));
        caret_x += scaled.h_advance(glyph_id);
        previous = Some(glyph_id);
    }

    let left = cx - caret_x / 2.0;
    // Middle of the ascent/descent box sits on cy (descent is negative)
    let baseline_y = cy + (scaled.ascent() + scaled.descent()) / 2.0;

    for (glyph_id, glyph_x) in glyphs {
        let glyph = glyph_id.with_scale_and_position(scale, point(left + glyph_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                blend_at(target, x, y, color, coverage);
            });
        }
    }
}

fn draw_bitmap(
    target: &mut RgbaImage,
    text: &str,
    size: f32,
    color: Color,
    cx: f32,
    cy: f32,
) -> Result<(), StampError> {
    let mut spleen = PSF2Font::new(FONT_12X24)
        .map_err(|_| StampError::Font("Failed to load built-in Spleen font".to_string()))?;

    let cell_height = (size.round() as usize).max(1);
    let cell_width = (cell_height / 2).max(1);
    let char_count = text.chars().count();

    let total_width = (char_count * cell_width) as f32;
    let left = (cx - total_width / 2.0).round() as i32;
    let top = (cy - cell_height as f32 / 2.0).round() as i32;

    for (index, ch) in text.chars().enumerate() {
        let glyph = spleen_bitmap(&mut spleen, ch);
        let origin_x = left + (index * cell_width) as i32;

        // Nearest-neighbor scale from 12x24 to the cell
        for dy in 0..cell_height {
            let sy = dy * SPLEEN_HEIGHT / cell_height;
            for dx in 0..cell_width {
                let sx = dx * SPLEEN_WIDTH / cell_width;
                if glyph[sy * SPLEEN_WIDTH + sx] {
                    blend_at(target, origin_x + dx as i32, top + dy as i32, color, 1.0);
                }
            }
        }
    }

    Ok(())
}

/// 12x24 on/off bitmap for a character; unknown characters get a box.
fn spleen_bitmap(spleen: &mut PSF2Font, ch: char) -> Vec<bool> {
    let mut bitmap = vec![false; SPLEEN_WIDTH * SPLEEN_HEIGHT];
    let utf8 = ch.to_string();

    match spleen.glyph_for_utf8(utf8.as_bytes()) {
        Some(glyph) => {
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < SPLEEN_HEIGHT && col_x < SPLEEN_WIDTH {
                        bitmap[row_y * SPLEEN_WIDTH + col_x] = on;
                    }
                }
            }
        }
        None => {
            for x in 0..SPLEEN_WIDTH {
                bitmap[x] = true;
                bitmap[(SPLEEN_HEIGHT - 1) * SPLEEN_WIDTH + x] = true;
            }
            for y in 0..SPLEEN_HEIGHT {
                bitmap[y * SPLEEN_WIDTH] = true;
                bitmap[y * SPLEEN_WIDTH + SPLEEN_WIDTH - 1] = true;
            }
        }
    }

    bitmap
}
