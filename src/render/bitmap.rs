//! HUD blitting

use super::{Renderer, Viewport};
use crate::display;

impl Renderer {
    /// Draw a packed 1bpp bitmap (rows padded to whole bytes, MSB first) with
    /// its top-left corner at (x, y).
    ///
    /// Set pixels are re-shaded at `brightness` with a bitmap-local dither
    /// phase (row as the pattern's x, column as its y), so a glyph keeps the
    /// same pattern wherever it is drawn. Clear pixels are transparent.
    pub fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &[u8], w: u32, h: u32, brightness: u8) {
        let byte_width = w.div_ceil(8);

        for j in 0..h {
            for i in 0..w {
                let Some(&byte) = bitmap.get((j * byte_width + i / 8) as usize) else {
                    return;
                };
                if byte & (0x80 >> (i % 8)) != 0 {
                    let on = self.shader.is_lit(j, i, brightness);
                    self.draw_pixel(x + i as i32, y + j as i32, on, Viewport::Screen);
                }
            }
        }
    }

    /// Draw text with the HUD font
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, spacing: u32) {
        display::draw_text(&mut self.buffer, x, y, text, spacing);
    }

    /// Draw a number of at most 3 characters with the HUD font
    pub fn draw_number(&mut self, x: i32, y: i32, num: i32) {
        display::draw_number(&mut self.buffer, x, y, num);
    }
}
