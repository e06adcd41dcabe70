//! Frame timing handed to every layer once per render tick.

use instant::Instant;

/// Elapsed and delta time of one render tick, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    pub elapsed: f32,
    pub delta: f32,
}

impl FrameTime {
    pub fn new(elapsed: f32, delta: f32) -> Self {
        Self { elapsed, delta }
    }

    /// Delta clamped to a usable step: negative or non-finite deltas become 0.
    #[inline]
    pub fn step(&self) -> f32 {
        if self.delta.is_finite() {
            self.delta.max(0.0)
        } else {
            0.0
        }
    }
}

/// Wall clock producing a [`FrameTime`] per call to [`FrameClock::tick`].
pub struct FrameClock {
    start: Instant,
    last: Instant,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            paused: false,
        }
    }

    /// A paused clock keeps reporting elapsed time but a zero delta.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        let delta = if self.paused { 0.0 } else { dt.as_secs_f32() };
        FrameTime {
            elapsed: (now - self.start).as_secs_f32(),
            delta,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
