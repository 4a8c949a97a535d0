//! Panel geometry and renderer tuning
//!
//! The constants are the values the panel was tuned for. `RenderConfig`
//! carries the same values at runtime so the simulator can be pointed at a
//! JSON file with a different geometry without a rebuild.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
/// Raycaster working height, the rows below are reserved for the HUD
pub const RENDER_HEIGHT: u32 = 56;

/// Adjacent columns painted per ray. Higher is faster and blockier.
pub const RES_DIVIDER: u32 = 2;
/// Screen columns sharing one depth buffer entry
pub const Z_RES_DIVIDER: u32 = 2;
/// Distances are stored as bytes; this is the fixed-point scale.
/// Must stay at or below 256 / `MAX_RENDER_DEPTH`.
pub const DISTANCE_MULTIPLIER: u32 = 20;
pub const MAX_RENDER_DEPTH: u32 = 12;
pub const MAX_SPRITE_DEPTH: u32 = 8;

/// Desired time per frame in ms (40 is 25 fps)
pub const FRAME_TIME_MS: f64 = 40.0;

pub const MELT_SPEED: u32 = 6;
pub const MELT_FRAMES: u32 = 30;

/// Runtime copy of the panel constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub render_height: u32,
    pub res_divider: u32,
    pub z_res_divider: u32,
    pub distance_multiplier: u32,
    pub max_render_depth: u32,
    pub max_sprite_depth: u32,
    pub frame_time_ms: f64,
    pub melt_speed: u32,
    pub melt_frames: u32,
}

impl RenderConfig {
    /// Number of depth buffer entries for this geometry
    #[inline]
    pub fn zbuffer_size(&self) -> usize {
        self.screen_width.div_ceil(self.z_res_divider) as usize
    }

    /// Reject geometry the renderer cannot address
    pub fn validate(&self) -> Result<(), String> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(format!(
                "screen size must be non-zero, got {}x{}",
                self.screen_width, self.screen_height
            ));
        }
        if self.render_height == 0 || self.render_height > self.screen_height {
            return Err(format!(
                "render height {} must be within 1..={}",
                self.render_height, self.screen_height
            ));
        }
        if self.res_divider == 0 || self.z_res_divider == 0 {
            return Err("resolution dividers must be non-zero".to_string());
        }
        if self.distance_multiplier == 0 {
            return Err("distance multiplier must be non-zero".to_string());
        }
        if self.distance_multiplier * self.max_render_depth > 255 {
            return Err(format!(
                "distance multiplier {} x render depth {} does not fit in a byte",
                self.distance_multiplier, self.max_render_depth
            ));
        }
        if self.frame_time_ms.is_nan() || self.frame_time_ms <= 0.0 {
            return Err(format!("frame time must be positive, got {}", self.frame_time_ms));
        }
        Ok(())
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path.as_ref(), json).map_err(|e| e.to_string())?;
        log::info!("saved render config to {}", path.as_ref().display());
        Ok(())
    }

    /// Load and validate config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read {}: {}", path.as_ref().display(), e))?;
        let config: Self = serde_json::from_str(&json).map_err(|e| e.to_string())?;
        config.validate()?;
        log::info!(
            "loaded render config from {} ({}x{})",
            path.as_ref().display(),
            config.screen_width,
            config.screen_height
        );
        Ok(config)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            render_height: RENDER_HEIGHT,
            res_divider: RES_DIVIDER,
            z_res_divider: Z_RES_DIVIDER,
            distance_multiplier: DISTANCE_MULTIPLIER,
            max_render_depth: MAX_RENDER_DEPTH,
            max_sprite_depth: MAX_SPRITE_DEPTH,
            frame_time_ms: FRAME_TIME_MS,
            melt_speed: MELT_SPEED,
            melt_frames: MELT_FRAMES,
        }
    }
}
