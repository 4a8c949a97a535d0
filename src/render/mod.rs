//! Raycaster rendering backend
//!
//! `Renderer` owns the framebuffer, the depth buffer and the dither shader.
//! The game decides what to draw each frame, in this order:
//! - `begin_frame` to clear the view and forget last frame's walls
//! - `draw_wall_column` once per ray
//! - `draw_sprite` per visible entity
//! - HUD via `draw_bitmap` / `draw_text`

mod bitmap;
mod gradient;
mod sprite;
mod zbuffer;

pub use gradient::{GradientShader, BAYER_GRADIENT, GRADIENT_LEVELS};
pub use sprite::SpriteSheet;
pub use zbuffer::{quantize, DepthBuffer, DEPTH_FAR};

use crate::config::RenderConfig;
use crate::display::Framebuffer;

/// Which rows a pixel write may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    /// The whole panel
    Screen,
    /// Only the raycaster rows above the HUD
    Raycaster,
}

pub struct Renderer {
    buffer: Framebuffer,
    zbuffer: DepthBuffer,
    shader: GradientShader,
    config: RenderConfig,
}

impl Renderer {
    /// Build a renderer for a validated geometry, using the built-in dither table
    pub fn new(config: RenderConfig) -> Result<Self, String> {
        Self::with_shader(config, GradientShader::bayer())
    }

    pub fn with_shader(config: RenderConfig, shader: GradientShader) -> Result<Self, String> {
        config.validate()?;
        log::debug!(
            "renderer {}x{} (view {} rows), res/{} z/{} x{}",
            config.screen_width,
            config.screen_height,
            config.render_height,
            config.res_divider,
            config.z_res_divider,
            config.distance_multiplier
        );
        Ok(Self {
            buffer: Framebuffer::with_size(config.screen_width, config.screen_height),
            zbuffer: DepthBuffer::new(
                config.screen_width,
                config.z_res_divider,
                config.distance_multiplier,
            ),
            shader,
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[inline]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.buffer
    }

    #[inline]
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.buffer
    }

    #[inline]
    pub fn zbuffer(&self) -> &DepthBuffer {
        &self.zbuffer
    }

    #[inline]
    pub fn zbuffer_mut(&mut self) -> &mut DepthBuffer {
        &mut self.zbuffer
    }

    #[inline]
    pub fn shader(&self) -> &GradientShader {
        &self.shader
    }

    /// Clear the panel and reset the depth buffer
    pub fn begin_frame(&mut self) {
        self.buffer.clear();
        self.zbuffer.reset();
    }

    #[inline]
    fn viewport_height(&self, viewport: Viewport) -> i32 {
        match viewport {
            Viewport::Screen => self.config.screen_height as i32,
            Viewport::Raycaster => self.config.render_height as i32,
        }
    }

    /// Plot one pixel. Anything outside the viewport is silently skipped.
    #[inline]
    pub fn draw_pixel(&mut self, x: i32, y: i32, on: bool, viewport: Viewport) {
        if y >= self.viewport_height(viewport) {
            return;
        }
        self.buffer.set_pixel(x, y, on);
    }

    /// Shaded vertical span for ray column `x`, painted `res_divider` columns
    /// wide. The span is clamped to the raycaster viewport. Does not touch
    /// the depth buffer.
    ///
    /// Pixels are packed into a byte per row-group and written with one
    /// byte store; partial groups at the span ends are merged so rows outside
    /// the span keep their contents.
    pub fn draw_vline(&mut self, x: i32, start_y: i32, end_y: i32, level: u8) {
        let lower = start_y.min(end_y).max(0);
        let upper = start_y.max(end_y).min(self.config.render_height as i32 - 1);
        if lower > upper {
            return;
        }

        for c in 0..self.config.res_divider as i32 {
            let px = x + c;
            if px < 0 || px >= self.config.screen_width as i32 {
                continue;
            }
            let px = px as u32;

            let mut bits = 0u8;
            let mut mask = 0u8;
            for y in lower as u32..=upper as u32 {
                let bp = y % 8;
                mask |= 1 << bp;
                if self.shader.is_lit(px, y, level) {
                    bits |= 1 << bp;
                }

                if bp == 7 {
                    self.flush_bits(px, y, bits, mask);
                    bits = 0;
                    mask = 0;
                }
            }

            if mask != 0 {
                self.flush_bits(px, upper as u32, bits, mask);
            }
        }
    }

    #[inline]
    fn flush_bits(&mut self, x: u32, y: u32, bits: u8, mask: u8) {
        if mask == 0xFF {
            self.buffer.set_byte(x, y, bits);
        } else {
            self.buffer.merge_byte(x, y, bits, mask);
        }
    }

    /// Wall pass: record `distance` in the depth buffer for every column of
    /// the ray, then draw the shaded span.
    pub fn draw_wall_column(&mut self, x: i32, start_y: i32, end_y: i32, level: u8, distance: f32) {
        for c in 0..self.config.res_divider as i32 {
            let px = x + c;
            if px >= 0 && px < self.config.screen_width as i32 {
                self.zbuffer.record(px, distance);
            }
        }
        self.draw_vline(x, start_y, end_y, level);
    }

    /// Shade for a wall at `distance`, black at `max_render_depth`
    pub fn wall_level(&self, distance: f32) -> u8 {
        self.shader
            .level_for_distance(distance, self.config.max_render_depth as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> Renderer {
        Renderer::new(RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = RenderConfig {
            res_divider: 0,
            ..RenderConfig::default()
        };
        assert!(Renderer::new(config).is_err());
    }

    #[test]
    fn test_viewport_clips_hud_rows() {
        let mut r = renderer();
        r.draw_pixel(5, 60, true, Viewport::Raycaster);
        assert!(!r.framebuffer().get_pixel(5, 60));
        r.draw_pixel(5, 60, true, Viewport::Screen);
        assert!(r.framebuffer().get_pixel(5, 60));
        r.draw_pixel(-5, 10, true, Viewport::Screen);
        r.draw_pixel(5, 10, true, Viewport::Raycaster);
        assert!(r.framebuffer().get_pixel(5, 10));
    }

    #[test]
    fn test_vline_max_level_with_divider() {
        let mut r = renderer();
        r.draw_vline(10, 0, 15, GRADIENT_LEVELS - 1);
        let bytes = r.framebuffer().as_bytes();
        assert_eq!(bytes[10], 0xFF);
        assert_eq!(bytes[128 + 10], 0xFF);
        assert_eq!(bytes[11], 0xFF);
        assert_eq!(bytes[128 + 11], 0xFF);
        assert_eq!(bytes[12], 0);
        assert_eq!(bytes[256 + 10], 0);
    }

    #[test]
    fn test_vline_full_column_extremes() {
        let mut r = renderer();
        r.framebuffer_mut().fill(true);
        r.draw_vline(20, 0, 63, 0);
        for y in 0..56 {
            assert!(!r.framebuffer().get_pixel(20, y));
            assert!(!r.framebuffer().get_pixel(21, y));
        }
        // HUD rows are outside the raycaster viewport
        assert!(r.framebuffer().get_pixel(20, 60));

        r.framebuffer_mut().clear();
        r.draw_vline(20, 63, 0, GRADIENT_LEVELS - 1);
        for y in 0..56 {
            assert!(r.framebuffer().get_pixel(20, y));
        }
        assert!(!r.framebuffer().get_pixel(20, 56));
    }

    #[test]
    fn test_vline_preserves_rows_outside_span() {
        let mut r = renderer();
        r.framebuffer_mut().set_pixel(30, 2, true);
        r.framebuffer_mut().set_pixel(30, 13, true);
        r.draw_vline(30, 4, 10, GRADIENT_LEVELS - 1);
        let fb = r.framebuffer();
        assert!(fb.get_pixel(30, 2));
        assert!(!fb.get_pixel(30, 3));
        assert!((4..=10).all(|y| fb.get_pixel(30, y)));
        assert!(!fb.get_pixel(30, 11));
        assert!(fb.get_pixel(30, 13));
    }

    #[test]
    fn test_vline_dither_matches_shader() {
        let mut r = renderer();
        r.draw_vline(40, 0, 55, 3);
        for c in 0..2 {
            for y in 0..56 {
                let x = 40 + c;
                assert_eq!(
                    r.framebuffer().get_pixel(x, y),
                    r.shader().is_lit(x as u32, y as u32, 3)
                );
            }
        }
    }

    #[test]
    fn test_vline_right_edge_clips() {
        let mut r = renderer();
        r.draw_vline(127, 0, 7, GRADIENT_LEVELS - 1);
        assert_eq!(r.framebuffer().as_bytes()[127], 0xFF);
        r.draw_vline(-1, 0, 7, GRADIENT_LEVELS - 1);
        assert_eq!(r.framebuffer().as_bytes()[0], 0xFF);
    }

    #[test]
    fn test_wall_column_records_depth() {
        let mut r = renderer();
        r.draw_wall_column(10, 20, 30, 4, 2.0);
        assert_eq!(r.zbuffer().get(10), 40);
        assert_eq!(r.zbuffer().get(11), 40);
        assert_eq!(r.zbuffer().get(12), DEPTH_FAR);
        r.draw_vline(12, 20, 30, 4);
        assert_eq!(r.zbuffer().get(12), DEPTH_FAR);
        r.begin_frame();
        assert_eq!(r.zbuffer().get(10), DEPTH_FAR);
        assert!(r.framebuffer().as_bytes().iter().all(|&b| b == 0));
    }
}
