//! Scaled, masked sprite projection

use super::{Renderer, Viewport};

/// A strip of equal-sized 1bpp sprites with a matching mask strip.
///
/// Both blobs are tightly packed rows (MSB = leftmost pixel), sprite `n`
/// starting at byte `n * bytes_per_sprite`. A mask bit of 0 is transparent.
#[derive(Debug, Clone, Copy)]
pub struct SpriteSheet {
    bitmap: &'static [u8],
    mask: &'static [u8],
    width: u32,
    height: u32,
}

impl SpriteSheet {
    /// Returns `None` unless both blobs have the same length and hold a whole
    /// number of `width` x `height` sprites
    pub fn new(bitmap: &'static [u8], mask: &'static [u8], width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || bitmap.len() != mask.len() {
            return None;
        }
        let per_sprite = (width.div_ceil(8) * height) as usize;
        if bitmap.is_empty() || bitmap.len() % per_sprite != 0 {
            return None;
        }
        Some(Self {
            bitmap,
            mask,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn byte_width(&self) -> u32 {
        self.width.div_ceil(8)
    }

    #[inline]
    pub fn bytes_per_sprite(&self) -> usize {
        (self.byte_width() * self.height) as usize
    }

    /// Number of sprites in the sheet
    pub fn count(&self) -> usize {
        self.bitmap.len() / self.bytes_per_sprite()
    }

    /// (color, opaque) for source pixel (sx, sy) of `sprite`, `None` when any
    /// index is out of range
    #[inline]
    pub fn pixel(&self, sprite: usize, sx: u32, sy: u32) -> Option<(bool, bool)> {
        if sprite >= self.count() || sx >= self.width || sy >= self.height {
            return None;
        }
        let offset =
            sprite * self.bytes_per_sprite() + (sy * self.byte_width() + sx / 8) as usize;
        let bit = 0x80 >> (sx % 8);
        Some((self.bitmap[offset] & bit != 0, self.mask[offset] & bit != 0))
    }
}

impl Renderer {
    /// Project `sprite` with its top-left corner at (x, y) as seen from
    /// `distance`. Smaller distances render larger; below 1.0 each source
    /// pixel becomes a block so close sprites don't break up.
    ///
    /// The depth test is done once at the anchor column: if a nearer wall
    /// covers `x` the whole sprite is skipped. Opaque pixels are drawn
    /// dithered at the distance shade, transparent ones leave the screen
    /// untouched. Sprites beyond `max_sprite_depth` are not drawn.
    pub fn draw_sprite(&mut self, x: i32, y: i32, sheet: &SpriteSheet, sprite: usize, distance: f32) {
        // Also rejects NaN
        if !(distance > 0.0) || distance > self.config.max_sprite_depth as f32 {
            return;
        }
        if sprite >= sheet.count() {
            return;
        }
        if self.zbuffer.is_occluded(x, distance) {
            return;
        }

        let tw = (sheet.width() as f32 / distance) as i32;
        let th = (sheet.height() as f32 / distance) as i32;
        let pixel_size = ((1.0 / distance).round() as i32).max(1);
        let level = self
            .shader
            .level_for_distance(distance, self.config.max_sprite_depth as f32);
        let screen_width = self.config.screen_width as i32;
        let render_height = self.config.render_height as i32;

        for ty in (0..th).step_by(pixel_size as usize) {
            let dy = y.saturating_add(ty);
            if dy >= render_height {
                break;
            }
            if dy < 0 {
                continue;
            }
            let sy = (ty as f32 * distance) as u32;
            let block_h = pixel_size.min(render_height - dy);

            for tx in (0..tw).step_by(pixel_size as usize) {
                let dx = x.saturating_add(tx);
                if dx >= screen_width {
                    break;
                }
                if dx < 0 {
                    continue;
                }
                let sx = (tx as f32 * distance) as u32;

                let Some((color, opaque)) = sheet.pixel(sprite, sx, sy) else {
                    continue;
                };
                if !opaque {
                    continue;
                }

                // Blocks of very close sprites are clipped to the viewport
                let block_w = pixel_size.min(screen_width - dx);
                for py in dy..dy + block_h {
                    for px in dx..dx + block_w {
                        let on = color && self.shader.is_lit(px as u32, py as u32, level);
                        self.draw_pixel(px, py, on, Viewport::Raycaster);
                    }
                }
            }
        }
    }
}
