//! The shared control signal and its smoothing.
//!
//! One [`SignalCell`] exists per session. The gesture processor is its only
//! writer; render ticks read it by value through [`SignalCell::snapshot`].
//! The lock is held for the copy only, so readers never wait on perception.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::constants::FALLBACK_OPENNESS;

/// Smoothed gesture state read by every particle layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlSignal {
    pub is_open: bool,
    /// Hand openness in \[0, 1\].
    pub openness: f32,
    /// Horizontal wrist position remapped to \[-1, 1\].
    pub rotation_x: f32,
    /// Vertical wrist position remapped to \[-1, 1\].
    pub rotation_y: f32,
    pub is_detected: bool,
}

/// One unsmoothed reading derived from a single perception frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub is_open: bool,
    pub openness: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub is_detected: bool,
}

impl Observation {
    /// The reading substituted when no hand is present or the frame is unusable.
    pub const FALLBACK: Observation = Observation {
        is_open: true,
        openness: FALLBACK_OPENNESS,
        rotation_x: 0.0,
        rotation_y: 0.0,
        is_detected: false,
    };
}

impl ControlSignal {
    /// Fold one observation in: numeric fields follow an exponential moving
    /// average, booleans are overwritten.
    pub fn smooth_toward(&mut self, raw: &Observation, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        self.openness = ema(self.openness, raw.openness, alpha).clamp(0.0, 1.0);
        self.rotation_x = ema(self.rotation_x, raw.rotation_x, alpha).clamp(-1.0, 1.0);
        self.rotation_y = ema(self.rotation_y, raw.rotation_y, alpha).clamp(-1.0, 1.0);
        self.is_open = raw.is_open;
        self.is_detected = raw.is_detected;
    }
}

#[inline]
pub fn ema(current: f32, target: f32, alpha: f32) -> f32 {
    current + (target - current) * alpha
}

/// Single-writer, multi-reader cell holding the session's [`ControlSignal`].
#[derive(Clone, Debug, Default)]
pub struct SignalCell {
    inner: Arc<Mutex<ControlSignal>>,
}

impl SignalCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current signal.
    pub fn snapshot(&self) -> ControlSignal {
        *self.lock()
    }

    /// Smooth `raw` into the shared signal and return the new value.
    pub fn apply(&self, raw: &Observation, alpha: f32) -> ControlSignal {
        let mut guard = self.lock();
        guard.smooth_toward(raw, alpha);
        *guard
    }

    /// Restore the session-start defaults.
    pub fn reset(&self) {
        *self.lock() = ControlSignal::default();
    }

    fn lock(&self) -> MutexGuard<'_, ControlSignal> {
        // A panicking writer cannot leave a half-written Copy value behind.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
