//! Fixed-interval frame pacing
//!
//! The game loop calls `wait()` once per logical frame. It blocks until the
//! frame budget has elapsed and records how late the frame actually was as
//! `delta` (1.0 = on time, 2.0 = took two frame budgets), which gameplay
//! multiplies into movement to stay frame-rate independent.

use std::time::{Duration, Instant};

/// Millisecond time source
pub trait Clock {
    /// Milliseconds since an arbitrary fixed point
    fn millis(&mut self) -> f64;

    /// Give up the CPU for up to `ms` milliseconds
    fn idle(&mut self, ms: f64);
}

/// Wall-clock time
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn millis(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    fn idle(&mut self, ms: f64) {
        if ms > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(ms / 1000.0));
        }
    }
}

pub struct FramePacer<C: Clock = SystemClock> {
    clock: C,
    frame_time_ms: f64,
    last_frame: f64,
    delta: f64,
    frames: u64,
}

impl FramePacer<SystemClock> {
    pub fn new(frame_time_ms: f64) -> Self {
        Self::with_clock(SystemClock::new(), frame_time_ms)
    }
}

impl<C: Clock> FramePacer<C> {
    pub fn with_clock(mut clock: C, frame_time_ms: f64) -> Self {
        let now = clock.millis();
        Self {
            clock,
            frame_time_ms,
            last_frame: now,
            delta: 1.0,
            frames: 0,
        }
    }

    /// Block until one frame budget has passed since the previous call,
    /// then update `delta`
    pub fn wait(&mut self) {
        loop {
            let elapsed = self.clock.millis() - self.last_frame;
            if elapsed >= self.frame_time_ms {
                break;
            }
            self.clock.idle(self.frame_time_ms - elapsed);
        }

        let now = self.clock.millis();
        self.delta = (now - self.last_frame) / self.frame_time_ms;
        if self.delta > 1.5 {
            log::trace!("frame {} overran: delta {:.2}", self.frames, self.delta);
        }
        self.last_frame = now;
        self.frames += 1;
    }

    /// Elapsed time of the last frame in frame budgets
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Frames per second implied by the last frame
    pub fn actual_fps(&self) -> f64 {
        1000.0 / (self.frame_time_ms * self.delta)
    }

    #[inline]
    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time_ms
    }

    /// Frames paced so far
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

/// Clock that only moves when told to, for tests and headless runs
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: f64,
    idle_calls: u32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without idling
    pub fn advance(&mut self, ms: f64) {
        self.now += ms;
    }

    /// How often the pacer idled
    pub fn idle_calls(&self) -> u32 {
        self.idle_calls
    }
}

impl Clock for ManualClock {
    fn millis(&mut self) -> f64 {
        self.now
    }

    fn idle(&mut self, ms: f64) {
        self.idle_calls += 1;
        self.now += ms.max(0.0);
    }
}
