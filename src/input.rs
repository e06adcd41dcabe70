use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use glam::Vec3;
use lumina_core::{LandmarkFrame, PerceptionError, PerceptionSource, LANDMARK_COUNT};
use lumina_core::{OPENNESS_MAX_OPEN, OPENNESS_MIN_CLOSED};

use crate::constants::{
    FINGER_ANGLES, POINTER_CAPTURE_FPS, POINTER_FIST_OPENNESS, POINTER_OPEN_OPENNESS,
    POINTER_RELAXED_OPENNESS,
};

#[derive(Default, Clone, Copy, Debug)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub inside: bool,
    pub left_down: bool,
    pub right_down: bool,
}

impl PointerState {
    /// Openness of the simulated hand: fist while the left button is held,
    /// spread while the right one is, relaxed otherwise.
    pub fn openness(&self) -> f32 {
        if self.left_down {
            POINTER_FIST_OPENNESS
        } else if self.right_down {
            POINTER_OPEN_OPENNESS
        } else {
            POINTER_RELAXED_OPENNESS
        }
    }
}

#[inline]
pub fn pointer_uv(width: u32, height: u32, pointer: &PointerState) -> [f32; 2] {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    [(pointer.x / w).clamp(0.0, 1.0), (pointer.y / h).clamp(0.0, 1.0)]
}

/// Build a 21-point hand with the wrist at `uv` whose fingertips sit at the
/// average distance that maps back to `openness`.
pub fn synthesize_hand(uv: [f32; 2], openness: f32) -> LandmarkFrame {
    let o = openness.clamp(0.0, 1.0);
    let reach = OPENNESS_MIN_CLOSED + o * (OPENNESS_MAX_OPEN - OPENNESS_MIN_CLOSED);
    let wrist = Vec3::new(uv[0], uv[1], 0.0);
    let mut points = Vec::with_capacity(LANDMARK_COUNT);
    points.push(wrist);
    for angle in FINGER_ANGLES {
        // image y grows downward, so fingers point toward -y
        let dir = Vec3::new(angle.sin(), -angle.cos(), 0.0);
        for joint in 1..=4 {
            points.push(wrist + dir * (reach * joint as f32 / 4.0));
        }
    }
    LandmarkFrame::from_points(points)
}

/// Perception source that reads the shared pointer instead of a camera.
pub struct PointerHandSource {
    pointer: Arc<Mutex<PointerState>>,
    size: Arc<Mutex<(u32, u32)>>,
    interval: Duration,
    last: Option<Instant>,
}

impl PointerHandSource {
    pub fn new(pointer: Arc<Mutex<PointerState>>, size: Arc<Mutex<(u32, u32)>>) -> Self {
        Self {
            pointer,
            size,
            interval: Duration::from_secs_f32(1.0 / POINTER_CAPTURE_FPS),
            last: None,
        }
    }
}

impl PerceptionSource for PointerHandSource {
    fn open(&mut self) -> Result<(), PerceptionError> {
        self.last = None;
        log::info!("[input] pointer hand source opened");
        Ok(())
    }

    fn next_frame(&mut self, timeout: Duration) -> Result<Option<LandmarkFrame>, PerceptionError> {
        if let Some(last) = self.last {
            let wait = self.interval.saturating_sub(last.elapsed());
            if wait > timeout {
                std::thread::sleep(timeout);
                return Ok(None);
            }
            std::thread::sleep(wait);
        }
        self.last = Some(Instant::now());

        let pointer = *self
            .pointer
            .lock()
            .map_err(|_| PerceptionError::Capture("pointer state poisoned".into()))?;
        if !pointer.inside {
            return Ok(Some(LandmarkFrame::empty()));
        }
        let (w, h) = *self
            .size
            .lock()
            .map_err(|_| PerceptionError::Capture("window size poisoned".into()))?;
        Ok(Some(synthesize_hand(pointer_uv(w, h, &pointer), pointer.openness())))
    }

    fn close(&mut self) {
        self.last = None;
        log::info!("[input] pointer hand source closed");
    }
}
