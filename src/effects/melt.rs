//! DOOM-style screen melt
//!
//! Every column waits a few frames (its offset from a fixed table) and then
//! slides down `speed` rows per frame, pulling black in from the top. The
//! effect reads and writes the same framebuffer, so row-groups are processed
//! bottom-up and each output byte is assembled from the pre-frame pixels
//! before it is stored.

use crate::config::RenderConfig;
use crate::display::{DisplayDriver, Framebuffer};
use crate::timing::{Clock, FramePacer};

/// Per-column start delays in frames, indexed by `x % MELT_OFFSET_PERIOD`
pub const MELT_OFFSETS: &[u8] =
    b"1234543234323454343456754321234321234543456543212345432123432123432345676";
pub const MELT_OFFSET_PERIOD: u32 = 64;

/// Frame delay before column `x` starts falling
#[inline]
pub fn column_offset(x: u32) -> u32 {
    (MELT_OFFSETS[(x % MELT_OFFSET_PERIOD) as usize] - b'0') as u32
}

#[derive(Debug, Clone)]
pub struct Melt {
    speed: u32,
    frames: u32,
    frame: u32,
}

impl Melt {
    pub fn new(speed: u32, frames: u32) -> Self {
        Self {
            speed,
            frames,
            frame: 0,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.melt_speed, config.melt_frames)
    }

    /// Frames already applied
    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.frame >= self.frames
    }

    /// Start over
    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// Pixel at (x, y) after melt frame `frame`
    #[inline]
    fn melted_pixel(&self, buffer: &Framebuffer, frame: u32, x: u32, y: u32) -> bool {
        let dy = if frame < column_offset(x) {
            y as i32
        } else {
            y as i32 - self.speed as i32
        };
        // Above the top edge is black
        dy >= 0 && buffer.get_pixel(x as i32, dy)
    }

    /// Apply one melt frame. Returns false, leaving the buffer untouched,
    /// once all frames have run.
    pub fn step(&mut self, buffer: &mut Framebuffer) -> bool {
        if self.is_finished() {
            return false;
        }

        let height = buffer.height();
        for group in (0..buffer.row_groups()).rev() {
            let base = group * 8;
            for x in 0..buffer.width() {
                let mut byte = 0u8;
                for bit in 0..8 {
                    let y = base + bit;
                    if y < height && self.melted_pixel(buffer, self.frame, x, y) {
                        byte |= 1 << bit;
                    }
                }
                buffer.set_byte(x, base, byte);
            }
        }

        self.frame += 1;
        true
    }

    /// Run the remaining frames to completion: pace, melt, flush
    pub fn run<C: Clock, D: DisplayDriver>(
        &mut self,
        buffer: &mut Framebuffer,
        pacer: &mut FramePacer<C>,
        display: &mut D,
    ) -> Result<(), String> {
        log::info!(
            "melt transition: {} frames at {} rows/frame",
            self.frames - self.frame.min(self.frames),
            self.speed
        );
        while !self.is_finished() {
            pacer.wait();
            self.step(buffer);
            display.flush(buffer)?;
        }
        log::debug!("melt transition done");
        Ok(())
    }
}

impl Default for Melt {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::ManualClock;

    struct CountingDisplay {
        flushes: u32,
        fail_after: Option<u32>,
    }

    impl DisplayDriver for CountingDisplay {
        fn flush(&mut self, _buffer: &Framebuffer) -> Result<(), String> {
            if self.fail_after == Some(self.flushes) {
                return Err("panel gone".to_string());
            }
            self.flushes += 1;
            Ok(())
        }
    }

    fn pattern() -> Framebuffer {
        let mut fb = Framebuffer::new();
        for y in 0..64 {
            for x in 0..128 {
                fb.set_pixel(x, y, (x * 7 + y * 3) % 5 < 2);
            }
        }
        fb
    }

    #[test]
    fn test_offsets_are_digits() {
        assert!(MELT_OFFSETS.len() >= MELT_OFFSET_PERIOD as usize);
        assert!(MELT_OFFSETS.iter().all(u8::is_ascii_digit));
        assert_eq!(column_offset(0), 1);
        assert_eq!(column_offset(64), 1);
        assert_eq!(column_offset(4), 5);
    }

    #[test]
    fn test_final_state_is_shifted_copy() {
        let before = pattern();
        let mut fb = pattern();
        let frames = 4;
        let speed = 2;
        let mut melt = Melt::new(speed, frames);
        while melt.step(&mut fb) {}

        for x in 0..128u32 {
            let shift = (frames.saturating_sub(column_offset(x)) * speed) as i32;
            for y in 0..64i32 {
                let expected = y - shift >= 0 && before.get_pixel(x as i32, y - shift);
                assert_eq!(fb.get_pixel(x as i32, y), expected, "column {x} row {y}");
            }
        }
    }

    #[test]
    fn test_column_waits_for_offset() {
        let before = pattern();
        let mut fb = pattern();
        let mut melt = Melt::new(6, 30);
        melt.step(&mut fb);
        // Column 1 has offset 2 and has not moved after one frame
        for y in 0..64 {
            assert_eq!(fb.get_pixel(1, y), before.get_pixel(1, y));
        }
    }

    #[test]
    fn test_default_melt_ends_black() {
        let mut fb = Framebuffer::new();
        fb.fill(true);
        let mut melt = Melt::default();
        let mut steps = 0;
        while melt.step(&mut fb) {
            steps += 1;
        }
        assert_eq!(steps, 30);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_extra_step_is_noop() {
        let mut fb = pattern();
        let mut melt = Melt::new(1, 3);
        while melt.step(&mut fb) {}
        let done = fb.as_bytes().to_vec();
        assert!(!melt.step(&mut fb));
        assert_eq!(fb.as_bytes(), &done[..]);
        assert_eq!(melt.frame(), 3);
    }

    #[test]
    fn test_partial_row_group_height() {
        let mut fb = Framebuffer::with_size(4, 12);
        fb.fill(true);
        let mut melt = Melt::new(1, 2);
        while melt.step(&mut fb) {}
        // Column 0 (offset 1) fell one row
        assert!(!fb.get_pixel(0, 0));
        assert!(fb.get_pixel(0, 1));
        assert!(fb.get_pixel(0, 11));
        // Bits below the last row stay clear
        assert_eq!(fb.get_byte(0, 8) & 0xF0, 0);
    }

    #[test_log::test]
    fn test_run_paces_and_flushes_every_frame() {
        let mut fb = pattern();
        let mut pacer = FramePacer::with_clock(ManualClock::new(), 40.0);
        let mut display = CountingDisplay {
            flushes: 0,
            fail_after: None,
        };
        let mut melt = Melt::new(6, 30);
        melt.run(&mut fb, &mut pacer, &mut display).unwrap();
        assert_eq!(display.flushes, 30);
        assert_eq!(pacer.frames(), 30);
        assert!(melt.is_finished());

        // Finished melt does nothing more
        melt.run(&mut fb, &mut pacer, &mut display).unwrap();
        assert_eq!(display.flushes, 30);
    }

    #[test]
    fn test_run_propagates_flush_error() {
        let mut fb = pattern();
        let mut pacer = FramePacer::with_clock(ManualClock::new(), 40.0);
        let mut display = CountingDisplay {
            flushes: 0,
            fail_after: Some(2),
        };
        let mut melt = Melt::new(6, 30);
        assert!(melt.run(&mut fb, &mut pacer, &mut display).is_err());
        assert_eq!(melt.frame(), 3);
    }
}
