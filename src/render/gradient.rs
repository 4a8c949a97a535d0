//! Ordered-dither shading
//!
//! A 1-bit panel has no gray, so shade levels are faked with a tiled bit
//! pattern per level. The table is addressed as
//! `level * width_bytes * height + (y % height) * width_bytes + (x / 8) % width_bytes`
//! and the pixel is bit `x % 8` of that byte, leftmost pixel in the MSB.

/// Shade levels in the built-in table
pub const GRADIENT_LEVELS: u8 = 8;
const BUILTIN_WIDTH_BYTES: u32 = 1;
const BUILTIN_HEIGHT: u32 = 8;

#[rustfmt::skip]
const BAYER_8X8: [[u8; 8]; 8] = [
    [ 0, 32,  8, 40,  2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44,  4, 36, 14, 46,  6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [ 3, 35, 11, 43,  1, 33,  9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47,  7, 39, 13, 45,  5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

const BUILTIN_SIZE: usize = GRADIENT_LEVELS as usize * BUILTIN_HEIGHT as usize;

const fn build_bayer_table() -> [u8; BUILTIN_SIZE] {
    let mut table = [0u8; BUILTIN_SIZE];
    let mut level = 0;
    while level < GRADIENT_LEVELS as usize {
        let mut y = 0;
        while y < 8 {
            let mut byte = 0u8;
            let mut x = 0;
            while x < 8 {
                // Pixel is lit when its threshold falls below level / (levels - 1)
                if (BAYER_8X8[y][x] as usize) * (GRADIENT_LEVELS as usize - 1) < level * 64 {
                    byte |= 0x80 >> x;
                }
                x += 1;
            }
            table[level * 8 + y] = byte;
            y += 1;
        }
        level += 1;
    }
    table
}

/// Built-in 8-level Bayer dither table (8x8 tile)
pub static BAYER_GRADIENT: [u8; BUILTIN_SIZE] = build_bayer_table();

/// Dither pattern lookup over a read-only, program-lifetime table
#[derive(Debug, Clone, Copy)]
pub struct GradientShader {
    table: &'static [u8],
    levels: u8,
    width_bytes: u32,
    height: u32,
}

impl GradientShader {
    /// Wrap a packed dither table. Returns `None` if the table size does not
    /// match `levels * width_bytes * height` or any dimension is zero.
    pub fn new(table: &'static [u8], levels: u8, width_bytes: u32, height: u32) -> Option<Self> {
        if levels < 2 || width_bytes == 0 || height == 0 {
            return None;
        }
        if table.len() != levels as usize * (width_bytes * height) as usize {
            return None;
        }
        Some(Self {
            table,
            levels,
            width_bytes,
            height,
        })
    }

    /// The built-in Bayer table
    pub fn bayer() -> Self {
        Self {
            table: &BAYER_GRADIENT,
            levels: GRADIENT_LEVELS,
            width_bytes: BUILTIN_WIDTH_BYTES,
            height: BUILTIN_HEIGHT,
        }
    }

    #[inline]
    pub fn levels(&self) -> u8 {
        self.levels
    }

    /// Brightest level (always solid white)
    #[inline]
    pub fn max_level(&self) -> u8 {
        self.levels - 1
    }

    /// Is pixel (x, y) lit at shade `level`.
    ///
    /// Level 0 is always off and `levels - 1` (or above) always on, whatever
    /// the table holds, so the ends of the range never show tiling.
    #[inline]
    pub fn is_lit(&self, x: u32, y: u32, level: u8) -> bool {
        if level == 0 {
            return false;
        }
        if level >= self.levels - 1 {
            return true;
        }

        let index = level as usize * (self.width_bytes * self.height) as usize
            + ((y % self.height) * self.width_bytes) as usize
            + ((x / 8) % self.width_bytes) as usize;

        self.table[index] & (0x80 >> (x % 8)) != 0
    }

    /// Map a distance to a shade: nearer is brighter, `max_depth` and beyond
    /// is black.
    pub fn level_for_distance(&self, distance: f32, max_depth: f32) -> u8 {
        if distance <= 0.0 || max_depth <= 0.0 {
            return self.max_level();
        }
        let t = (1.0 - distance / max_depth).clamp(0.0, 1.0);
        ((t * self.levels as f32).ceil() as u8).min(self.max_level())
    }
}

impl Default for GradientShader {
    fn default() -> Self {
        Self::bayer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static ALL_ZERO: [u8; 4 * 2 * 4] = [0; 32];
    static ALL_ONE: [u8; 4 * 2 * 4] = [0xFF; 32];

    fn lit_in_tile(shader: &GradientShader, level: u8) -> usize {
        (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| shader.is_lit(x, y, level))
            .count()
    }

    #[test]
    fn test_boundaries_ignore_table() {
        for table in [&ALL_ZERO, &ALL_ONE] {
            let shader = GradientShader::new(table, 4, 2, 4).unwrap();
            for y in 0..20 {
                for x in 0..40 {
                    assert!(!shader.is_lit(x, y, 0));
                    assert!(shader.is_lit(x, y, 3));
                    assert!(shader.is_lit(x, y, 200));
                }
            }
        }
    }

    #[test]
    fn test_interior_levels_read_table() {
        let zero = GradientShader::new(&ALL_ZERO, 4, 2, 4).unwrap();
        let one = GradientShader::new(&ALL_ONE, 4, 2, 4).unwrap();
        assert!(!zero.is_lit(5, 5, 1));
        assert!(one.is_lit(5, 5, 2));
    }

    #[test]
    fn test_rejects_mismatched_table() {
        assert!(GradientShader::new(&ALL_ZERO, 4, 2, 5).is_none());
        assert!(GradientShader::new(&ALL_ZERO, 1, 32, 1).is_none());
    }

    #[test]
    fn test_bayer_is_monotonic() {
        let shader = GradientShader::bayer();
        let mut previous = 0;
        for level in 0..GRADIENT_LEVELS {
            let lit = lit_in_tile(&shader, level);
            assert!(lit >= previous, "level {level} darker than level below");
            previous = lit;
        }
        assert_eq!(lit_in_tile(&shader, 0), 0);
        assert_eq!(lit_in_tile(&shader, GRADIENT_LEVELS - 1), 64);
    }

    #[test]
    fn test_pattern_tiles() {
        let shader = GradientShader::bayer();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(shader.is_lit(x, y, 3), shader.is_lit(x + 8, y + 16, 3));
            }
        }
    }

    #[test]
    fn test_level_for_distance() {
        let shader = GradientShader::bayer();
        assert_eq!(shader.level_for_distance(0.5, 8.0), 7);
        assert_eq!(shader.level_for_distance(4.0, 8.0), 4);
        assert_eq!(shader.level_for_distance(8.0, 8.0), 0);
        assert_eq!(shader.level_for_distance(20.0, 8.0), 0);
    }
}
