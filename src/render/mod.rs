//! Raster canvas and word painting
//!
//! The canvas is an RGBA image cleared to full transparency at the start
//! of every pass, matching the dashboard's `clearRect`. Words are drawn
//! centered on their placement point, glyph coverage alpha-blended in
//! the theme color picked by the word's placement order.

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use palette::Srgb;
use std::path::Path;

use crate::fonts::LoadedFont;
use crate::layout::{CanvasSize, PlacedWord};
use crate::theme::Theme;

/// RGBA drawing surface for one placement pass
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(size: CanvasSize) -> Self {
        // RgbaImage::new zero-fills, which is already transparent black
        Self {
            image: RgbaImage::new(size.width.max(1), size.height.max(1)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Source-over blend of `color` at `coverage` onto one pixel;
    /// out-of-bounds coordinates are clipped.
    pub fn blend(&mut self, x: i64, y: i64, color: Srgb<u8>, coverage: u8) {
        if coverage == 0 {
            return;
        }
        if x < 0 || y < 0 || x >= i64::from(self.image.width()) || y >= i64::from(self.image.height())
        {
            return;
        }

        let src_alpha = f32::from(coverage) / 255.0;
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let dst_alpha = f32::from(dst[3]) / 255.0;
        let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);

        if out_alpha <= 0.0 {
            *dst = Rgba([0, 0, 0, 0]);
            return;
        }

        let src = [
            f32::from(color.red),
            f32::from(color.green),
            f32::from(color.blue),
        ];
        for channel in 0..3 {
            let blended = (src[channel] * src_alpha
                + f32::from(dst[channel]) * dst_alpha * (1.0 - src_alpha))
                / out_alpha;
            dst[channel] = blended.round() as u8;
        }
        dst[3] = (out_alpha * 255.0).round() as u8;
    }

    pub fn save_png(&self, path: &Path) -> Result<(), image::ImageError> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Paints a placement registry onto a canvas
pub struct CloudPainter<'a> {
    font: &'a LoadedFont,
    theme: &'a Theme,
}

impl<'a> CloudPainter<'a> {
    pub fn new(font: &'a LoadedFont, theme: &'a Theme) -> Self {
        Self { font, theme }
    }

    /// Clear the surface and draw every placed word
    pub fn paint(&self, canvas: &mut Canvas, placements: &[PlacedWord]) {
        canvas.clear();
        for word in placements {
            self.paint_word(canvas, word);
        }
    }

    fn paint_word(&self, canvas: &mut Canvas, word: &PlacedWord) {
        let color = self.theme.color_for(word.order);
        let baseline = self.font.centered_baseline(word.y, word.font_size);
        let mut pen_x = word.x - word.width / 2.0;

        // TODO: run the glyphs through rustybuzz so Arabic letters take
        // their joined forms; per-char advances already match the
        // measured collision box.
        for ch in word.text.chars() {
            let (metrics, bitmap) = self.font.font().rasterize(ch, word.font_size);
            let left = (pen_x + metrics.xmin as f32).round() as i64;
            let top = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i64;

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let coverage = bitmap[row * metrics.width + col];
                    canvas.blend(left + col as i64, top + row as i64, color, coverage);
                }
            }

            pen_x += metrics.advance_width;
        }
    }
}
