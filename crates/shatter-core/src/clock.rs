use crate::constants::MAX_FRAME_DELTA;
use instant::Instant;

#[derive(Clone, Copy, Debug)]
pub struct FrameTime {
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Seconds since the clock started; drives the cosmetic pulse.
    pub elapsed: f64,
}

impl FrameTime {
    /// `delta` clamped to \[0, [`MAX_FRAME_DELTA`]\] for anything that
    /// integrates over it. The first tick absorbs startup time.
    pub fn step(&self) -> f32 {
        if self.delta.is_nan() {
            0.0
        } else {
            self.delta.clamp(0.0, MAX_FRAME_DELTA)
        }
    }
}

/// Monotonic per-frame timing for the render loop.
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let delta = (now - self.last).as_secs_f32();
        self.last = now;
        FrameTime {
            delta,
            elapsed: (now - self.start).as_secs_f64(),
        }
    }
}
