//! Coarse per-column depth buffer
//!
//! One byte per group of `z_res_divider` screen columns holding the nearest
//! wall distance seen this frame, in fixed point (`distance * multiplier`).
//! `0xFF` means nothing recorded.

/// Reset value: no wall / farthest
pub const DEPTH_FAR: u8 = 0xFF;

/// Fixed-point a distance into a byte, truncating and clamping
#[inline]
pub fn quantize(distance: f32, multiplier: u32) -> u8 {
    (distance * multiplier as f32).clamp(0.0, 255.0) as u8
}

pub struct DepthBuffer {
    depth: Vec<u8>,
    divider: u32,
    multiplier: u32,
}

impl DepthBuffer {
    /// Create a buffer covering `screen_width` columns, every entry at `DEPTH_FAR`
    pub fn new(screen_width: u32, divider: u32, multiplier: u32) -> Self {
        let divider = divider.max(1);
        Self {
            depth: vec![DEPTH_FAR; screen_width.div_ceil(divider) as usize],
            divider,
            multiplier,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.depth.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    /// Forget last frame's walls. Call once per frame before the wall pass.
    pub fn reset(&mut self) {
        self.depth.fill(DEPTH_FAR);
    }

    /// Group index for a screen column, clamped onto the screen
    #[inline]
    fn group(&self, column: i32) -> usize {
        let max_column = (self.depth.len() as u32 * self.divider) as i32 - 1;
        (column.clamp(0, max_column.max(0)) as u32 / self.divider) as usize
    }

    /// Stored value for the group containing `column`
    #[inline]
    pub fn get(&self, column: i32) -> u8 {
        self.depth[self.group(column)]
    }

    /// Record a wall at `distance` for `column`, keeping the nearest wall
    /// seen in the column's group this frame
    #[inline]
    pub fn record(&mut self, column: i32, distance: f32) {
        let group = self.group(column);
        let z = quantize(distance, self.multiplier);
        if z < self.depth[group] {
            self.depth[group] = z;
        }
    }

    /// True when a wall strictly nearer than `distance` covers `column`
    #[inline]
    pub fn is_occluded(&self, column: i32, distance: f32) -> bool {
        (self.get(column) as f32) < distance * self.multiplier as f32
    }

    /// Raw entries, one per column group
    pub fn as_slice(&self) -> &[u8] {
        &self.depth
    }
}
