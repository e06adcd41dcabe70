//! Turning hand landmarks into control-signal observations.
//!
//! A frame is the landmark set a hand estimator reported for one capture tick,
//! in normalized image coordinates (x and y in \[0, 1\], origin top-left).
//! Only the wrist and the five fingertips are read:
//!
//! | Index | Landmark |
//! |---|---|
//! | 0 | wrist |
//! | 4 | thumb tip |
//! | 8 | index tip |
//! | 12 | middle tip |
//! | 16 | ring tip |
//! | 20 | pinky tip |

use glam::Vec3;
use smallvec::SmallVec;

use crate::constants::{
    FINGERTIPS, LANDMARK_COUNT, OPENNESS_MAX_OPEN, OPENNESS_MIN_CLOSED, OPEN_THRESHOLD,
    SIGNAL_SMOOTHING_ALPHA, WRIST,
};
use crate::signal::{ControlSignal, Observation, SignalCell};

/// Landmarks reported for one capture tick. Empty means no hand was seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkFrame {
    pub points: SmallVec<[Vec3; LANDMARK_COUNT]>,
}

impl LandmarkFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[inline]
fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    a.truncate().distance(b.truncate())
}

/// Map an average wrist-to-fingertip distance onto \[0, 1\].
#[inline]
pub fn openness_from_spread(avg_dist: f32) -> f32 {
    ((avg_dist - OPENNESS_MIN_CLOSED) / (OPENNESS_MAX_OPEN - OPENNESS_MIN_CLOSED)).clamp(0.0, 1.0)
}

/// Derive one raw observation from a frame.
///
/// Frames that are empty, shorter than the 21-point hand model, or carry
/// non-finite coordinates yield [`Observation::FALLBACK`].
pub fn observe(frame: &LandmarkFrame) -> Observation {
    if frame.len() < LANDMARK_COUNT {
        return Observation::FALLBACK;
    }
    let pts = &frame.points;
    let wrist = pts[WRIST];
    let total: f32 = FINGERTIPS
        .iter()
        .map(|&tip| planar_distance(wrist, pts[tip]))
        .sum();
    let avg_dist = total / FINGERTIPS.len() as f32;
    if !avg_dist.is_finite() || !wrist.x.is_finite() || !wrist.y.is_finite() {
        return Observation::FALLBACK;
    }

    let openness = openness_from_spread(avg_dist);
    Observation {
        is_open: openness > OPEN_THRESHOLD,
        openness,
        rotation_x: ((wrist.x - 0.5) * 2.0).clamp(-1.0, 1.0),
        rotation_y: ((wrist.y - 0.5) * 2.0).clamp(-1.0, 1.0),
        is_detected: true,
    }
}

/// Feeds observations into the shared [`SignalCell`].
#[derive(Clone, Debug)]
pub struct GestureProcessor {
    cell: SignalCell,
    alpha: f32,
    was_detected: bool,
}

impl GestureProcessor {
    pub fn new(cell: SignalCell) -> Self {
        Self::with_alpha(cell, SIGNAL_SMOOTHING_ALPHA)
    }

    pub fn with_alpha(cell: SignalCell, alpha: f32) -> Self {
        Self {
            cell,
            alpha: alpha.clamp(0.0, 1.0),
            was_detected: false,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn cell(&self) -> &SignalCell {
        &self.cell
    }

    /// Observe `frame`, smooth it into the cell and return the raw observation.
    pub fn process(&mut self, frame: &LandmarkFrame) -> Observation {
        let raw = observe(frame);
        self.push(&raw);
        raw
    }

    /// Smooth an already-derived observation into the cell.
    pub fn push(&mut self, raw: &Observation) -> ControlSignal {
        if raw.is_detected != self.was_detected {
            log::debug!(
                "[gesture] hand {}",
                if raw.is_detected { "acquired" } else { "lost" }
            );
            self.was_detected = raw.is_detected;
        }
        self.cell.apply(raw, self.alpha)
    }
}
