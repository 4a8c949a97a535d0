use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

// ============================================================================
// Framebuffer
// ============================================================================

/// Packed 1bpp framebuffer in the panel's native page layout.
///
/// Each byte holds 8 vertically stacked pixels of one column. Byte
/// `(y / 8) * width + x` covers rows `y & !7 ..= (y & !7) + 7` of column `x`,
/// bit `y % 8` (bit 0 is the topmost of the 8). This is exactly the image the
/// display driver streams to the controller.
pub struct Framebuffer {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl Framebuffer {
    /// Create a framebuffer with the panel's default resolution (128x64)
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a cleared framebuffer of `width * ceil(height / 8)` bytes
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            bytes: vec![0; (width * height.div_ceil(8)) as usize],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of 8-row groups (pages)
    #[inline]
    pub fn row_groups(&self) -> u32 {
        self.height.div_ceil(8)
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Byte offset of the row-group containing (x, y)
    #[inline]
    fn byte_index(&self, x: u32, y: u32) -> usize {
        ((y / 8) * self.width + x) as usize
    }

    /// Clear every pixel to black
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Set every pixel to the same value
    pub fn fill(&mut self, on: bool) {
        self.bytes.fill(if on { 0xFF } else { 0x00 });
    }

    /// Set or clear one pixel. Out of bounds is a silent no-op.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.byte_index(x as u32, y as u32);
        let bit = 1u8 << (y & 7);
        if on {
            self.bytes[idx] |= bit;
        } else {
            self.bytes[idx] &= !bit;
        }
    }

    /// Read one pixel. Out of bounds reads as black.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.bytes[self.byte_index(x as u32, y as u32)] & (1 << (y & 7)) != 0
    }

    /// Write 8 vertically stacked pixels at once.
    ///
    /// `y` is any row inside the target row-group; only `y / 8` is used.
    /// Callers are responsible for passing an on-screen column and row; the
    /// index is not clipped.
    #[inline]
    pub fn set_byte(&mut self, x: u32, y: u32, byte: u8) {
        let idx = self.byte_index(x, y);
        self.bytes[idx] = byte;
    }

    /// Read the 8 pixels of the row-group containing `y`
    #[inline]
    pub fn get_byte(&self, x: u32, y: u32) -> u8 {
        self.bytes[self.byte_index(x, y)]
    }

    /// Replace only the bits selected by `mask` in the row-group containing `y`
    #[inline]
    pub fn merge_byte(&mut self, x: u32, y: u32, byte: u8, mask: u8) {
        let idx = self.byte_index(x, y);
        self.bytes[idx] = (self.bytes[idx] & !mask) | (byte & mask);
    }

    /// Clear a rectangle to black, clipped to the screen
    pub fn clear_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (i64::from(x) + i64::from(w)).min(i64::from(self.width)) as i32;
        let y1 = (i64::from(y) + i64::from(h)).min(i64::from(self.height)) as i32;
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, false);
            }
        }
    }

    /// Invert every pixel
    pub fn invert(&mut self) {
        for b in &mut self.bytes {
            *b = !*b;
        }
    }

    /// The packed image, in display transfer order
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable access to the packed image
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Expand into a row-major RGBA8888 image (ABGR byte order, as used by
    /// the simulator's streaming texture)
    pub fn to_rgba(&self, on: (u8, u8, u8), off: (u8, u8, u8), dest: &mut Vec<u8>) {
        dest.clear();
        dest.reserve((self.width * self.height * 4) as usize);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let (r, g, b) = if self.get_pixel(x, y) { on } else { off };
                dest.extend_from_slice(&[255, b, g, r]);
            }
        }
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_rounds_up_to_row_group() {
        let fb = Framebuffer::with_size(10, 12);
        assert_eq!(fb.as_bytes().len(), 20);
        assert_eq!(fb.row_groups(), 2);
    }

    #[test]
    fn test_set_pixel_layout() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(3, 0, true);
        fb.set_pixel(3, 9, true);
        assert_eq!(fb.as_bytes()[3], 0b0000_0001);
        assert_eq!(fb.as_bytes()[128 + 3], 0b0000_0010);
    }

    #[test]
    fn test_set_clear_preserves_neighbors() {
        let mut fb = Framebuffer::new();
        fb.set_byte(7, 16, 0b1010_1010);
        fb.set_pixel(7, 16, true);
        assert!(fb.get_pixel(7, 16));
        assert_eq!(fb.get_byte(7, 16), 0b1010_1011);
        fb.set_pixel(7, 17, false);
        assert!(!fb.get_pixel(7, 17));
        assert_eq!(fb.get_byte(7, 16), 0b1010_1001);
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(-1, 0, true);
        fb.set_pixel(128, 0, true);
        fb.set_pixel(0, 64, true);
        fb.set_pixel(0, -3, true);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
        assert!(!fb.get_pixel(500, 500));
    }

    #[test]
    fn test_merge_byte_masks() {
        let mut fb = Framebuffer::new();
        fb.set_byte(0, 0, 0b1111_0000);
        fb.merge_byte(0, 0, 0b0000_0101, 0b0000_1111);
        assert_eq!(fb.get_byte(0, 0), 0b1111_0101);
    }

    #[test]
    fn test_clear_rect_clips() {
        let mut fb = Framebuffer::new();
        fb.fill(true);
        fb.clear_rect(120, 60, 20, 20);
        assert!(!fb.get_pixel(127, 63));
        assert!(!fb.get_pixel(120, 60));
        assert!(fb.get_pixel(119, 63));
        assert!(fb.get_pixel(127, 59));
    }

    #[test]
    fn test_clear_rect_huge_size_clears_to_edge() {
        let mut fb = Framebuffer::new();
        fb.fill(true);
        fb.clear_rect(10, 0, u32::MAX, 8);
        assert!(!fb.get_pixel(20, 0));
        assert!(!fb.get_pixel(127, 7));
        assert!(fb.get_pixel(9, 0));
        assert!(fb.get_pixel(20, 8));

        fb.clear_rect(i32::MAX - 1, 0, u32::MAX, u32::MAX);
        fb.clear_rect(-5, 40, u32::MAX, 1);
        assert!(!fb.get_pixel(0, 40));
        assert!(fb.get_pixel(0, 41));
    }

    #[test]
    fn test_to_rgba_expands_pixels() {
        let mut fb = Framebuffer::with_size(2, 1);
        fb.set_pixel(1, 0, true);
        let mut out = Vec::new();
        fb.to_rgba((255, 255, 255), (0, 0, 0), &mut out);
        assert_eq!(out, vec![255, 0, 0, 0, 255, 255, 255, 255]);
    }
}
