//! The drawing surface the editor renders into.
//!
//! Mirrors a 2D canvas: it has an intrinsic size, is cleared to transparent,
//! and everything is composited source-over.

use image::{imageops, Rgba, RgbaImage};

use super::color::Color;

/// Half the crosshair span; the full span is 20 px.
pub const CROSSHAIR_HALF_SPAN: i32 = 10;

/// An RGBA drawing surface with an intrinsic resolution.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Change the intrinsic size. Like resizing a canvas, this clears it.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::new(width, height);
    }

    /// Clear every pixel to transparent.
    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Composite `image` with its top-left corner at the origin.
    pub fn draw_image(&mut self, image: &RgbaImage) {
        imageops::overlay(&mut self.pixels, image, 0, 0);
    }

    /// Stroke a 1 px crosshair on `(x, y)`: each arm covers the 20 pixels
    /// from `x - 10` up to, not including, `x + 10`, like a canvas path
    /// from `x - 10` to `x + 10`.
    pub fn stroke_crosshair(&mut self, x: i64, y: i64, color: Color) {
        let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
            return;
        };

        for dx in -CROSSHAIR_HALF_SPAN..CROSSHAIR_HALF_SPAN {
            blend_at(&mut self.pixels, x.saturating_add(dx), y, color, 1.0);
        }
        // Center pixel is already covered by the horizontal stroke
        for dy in (-CROSSHAIR_HALF_SPAN..CROSSHAIR_HALF_SPAN).filter(|d| *d != 0) {
            blend_at(&mut self.pixels, x, y.saturating_add(dy), color, 1.0);
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

/// Composite `color` at `coverage` over the pixel at `(x, y)`.
///
/// Out-of-bounds coordinates are ignored.
pub fn blend_at(target: &mut RgbaImage, x: i32, y: i32, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= target.width() || y as u32 >= target.height() {
        return;
    }
    let pixel = target.get_pixel_mut(x as u32, y as u32);

    let src_a = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    if src_a >= 1.0 {
        *pixel = Rgba([color.r, color.g, color.b, 255]);
        return;
    }

    let dst_a = pixel[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    let mix = |src: u8, dst: u8| {
        let value = (src as f32 * src_a + dst as f32 * dst_a * (1.0 - src_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };

    *pixel = Rgba([
        mix(color.r, pixel[0]),
        mix(color.g, pixel[1]),
        mix(color.b, pixel[2]),
        (out_a * 255.0).round() as u8,
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_clears() {
        let mut surface = Surface::new(4, 4);
        surface.draw_image(&RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])));
        surface.resize(8, 6);
        assert_eq!((surface.width(), surface.height()), (8, 6));
        assert!(surface.pixels().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_image_at_origin() {
        let mut surface = Surface::new(10, 10);
        surface.draw_image(&RgbaImage::from_pixel(3, 3, Rgba([200, 10, 10, 255])));
        assert_eq!(surface.pixels().get_pixel(2, 2).0, [200, 10, 10, 255]);
        assert_eq!(surface.pixels().get_pixel(3, 3).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_crosshair_span() {
        let mut surface = Surface::new(60, 60);
        surface.draw_image(&RgbaImage::from_pixel(60, 60, Rgba([255, 255, 255, 255])));
        surface.stroke_crosshair(30, 30, Color::CROSSHAIR);

        let touched = |x: u32, y: u32| surface.pixels().get_pixel(x, y).0 != [255, 255, 255, 255];
        let horizontal = (0..60).filter(|x| touched(*x, 30)).count();
        let vertical = (0..60).filter(|y| touched(30, *y)).count();
        assert_eq!((horizontal, vertical), (20, 20));
        assert!(touched(20, 30));
        assert!(touched(39, 30));
        assert!(!touched(40, 30));
        assert!(touched(30, 20));
        assert!(!touched(30, 40));
        assert!(!touched(31, 31));

        // Semi-transparent green over white stays white-ish in red/blue
        let center = surface.pixels().get_pixel(30, 30).0;
        assert_eq!(center[1], 255);
        assert!(center[0] > 60 && center[0] < 90, "red channel {}", center[0]);
    }

    #[test]
    fn test_crosshair_near_edge_is_clipped() {
        let mut surface = Surface::new(5, 5);
        surface.stroke_crosshair(0, 0, Color::CROSSHAIR);
        assert!(surface.pixels().get_pixel(4, 0)[3] > 0);
        assert!(surface.pixels().get_pixel(1, 1)[3] == 0);
    }

    #[test]
    fn test_blend_opaque_replaces() {
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255]));
        blend_at(&mut img, 0, 0, Color::rgb(9, 8, 7), 1.0);
        assert_eq!(img.get_pixel(0, 0).0, [9, 8, 7, 255]);
    }

    #[test]
    fn test_blend_out_of_bounds_ignored() {
        let mut img = RgbaImage::new(2, 2);
        blend_at(&mut img, -1, 0, Color::BLACK, 1.0);
        blend_at(&mut img, 0, 2, Color::BLACK, 1.0);
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }
}
