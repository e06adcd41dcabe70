//! Per-frame particle choreography.
//!
//! Each frame a particle's target is its rest position, pushed along its
//! scatter offset by the squared effective openness, plus a small drift. The
//! displayed position then decays toward that target at a fixed rate, so the
//! layer moves smoothly between its settled and scattered shapes without any
//! explicit state machine.

use glam::Vec3;

use crate::clock::FrameTime;
use crate::constants::{
    DRIFT_AMPLITUDE_X, DRIFT_AMPLITUDE_Y, DRIFT_FREQ_X, DRIFT_FREQ_Y, DRIFT_SPATIAL,
    IDLE_BREATH_AMPLITUDE, IDLE_BREATH_CENTER, IDLE_BREATH_FREQ, POSITION_LERP_RATE,
    SIZE_OPENNESS_GAIN, TILT_GAIN_X, TILT_GAIN_Y, TREE_IDLE_SPIN, TREE_OPACITY, TREE_POINT_SIZE,
};
use crate::shape::{RestGeometry, ScatterVector, ShapeMode};
use crate::signal::ControlSignal;
use crate::state::PointStyle;

/// Openness substituted while no hand is detected.
#[inline]
pub fn idle_breathing(elapsed: f32) -> f32 {
    (elapsed * IDLE_BREATH_FREQ).sin() * IDLE_BREATH_AMPLITUDE + IDLE_BREATH_CENTER
}

#[inline]
pub fn effective_openness(signal: &ControlSignal, elapsed: f32) -> f32 {
    if signal.is_detected {
        signal.openness.clamp(0.0, 1.0)
    } else {
        idle_breathing(elapsed)
    }
}

/// Blend weight between rest and scattered position. Squaring flattens the
/// response near zero so small openness jitter barely moves particles.
#[inline]
pub fn explosion_factor(openness: f32) -> f32 {
    let o = openness.clamp(0.0, 1.0);
    o * o
}

/// Small sway added to a rest position; `phase` desynchronizes layers.
#[inline]
pub fn ambient_drift(rest: Vec3, elapsed: f32, phase: f32) -> Vec3 {
    Vec3::new(
        (elapsed * DRIFT_FREQ_X + rest.y * DRIFT_SPATIAL + phase).sin() * DRIFT_AMPLITUDE_X,
        (elapsed * DRIFT_FREQ_Y + rest.x * DRIFT_SPATIAL + phase).cos() * DRIFT_AMPLITUDE_Y,
        0.0,
    )
}

/// Fraction of the remaining distance covered in one step of `dt` seconds.
#[inline]
pub fn approach_factor(rate: f32, dt: f32) -> f32 {
    let f = rate * dt;
    if f.is_finite() {
        f.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolverParams {
    /// Higher is snappier; per second.
    pub lerp_rate: f32,
    /// Constant yaw speed in rad/s.
    pub idle_spin: f32,
    pub tilt_gain_y: f32,
    pub tilt_gain_x: f32,
    pub drift_phase: f32,
    pub base_size: f32,
    pub opacity: f32,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            lerp_rate: POSITION_LERP_RATE,
            idle_spin: TREE_IDLE_SPIN,
            tilt_gain_y: TILT_GAIN_Y,
            tilt_gain_x: TILT_GAIN_X,
            drift_phase: 0.0,
            base_size: TREE_POINT_SIZE,
            opacity: TREE_OPACITY,
        }
    }
}

/// Change in layer rotation produced by one tick, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationDelta {
    pub x: f32,
    pub y: f32,
}

/// One independently animated point cloud.
#[derive(Clone, Debug)]
pub struct ParticleLayer {
    mode: ShapeMode,
    rest: RestGeometry,
    scatter: ScatterVector,
    display: Vec<Vec3>,
    rotation: Vec3,
    style: PointStyle,
    params: SolverParams,
}

impl ParticleLayer {
    /// Build a layer from its rest shape and scatter offsets.
    ///
    /// If the two disagree in length both are truncated to the shorter one, so
    /// rest, scatter and display buffers always share one particle count.
    pub fn new(
        mode: ShapeMode,
        rest: RestGeometry,
        scatter: ScatterVector,
        params: SolverParams,
    ) -> Self {
        let (rest, scatter) = if rest.len() == scatter.len() {
            (rest, scatter)
        } else {
            log::warn!(
                "[solver] rest ({}) and scatter ({}) lengths differ; truncating",
                rest.len(),
                scatter.len()
            );
            let n = rest.len().min(scatter.len());
            (
                RestGeometry::from_points(rest.points()[..n].to_vec()),
                ScatterVector::from_offsets(scatter.offsets()[..n].to_vec()),
            )
        };
        let display = rest.points().to_vec();
        let style = PointStyle {
            size: params.base_size,
            opacity: params.opacity,
            additive: true,
        };
        Self {
            mode,
            rest,
            scatter,
            display,
            rotation: Vec3::ZERO,
            style,
            params,
        }
    }

    pub fn mode(&self) -> ShapeMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.display.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }

    pub fn rest(&self) -> &RestGeometry {
        &self.rest
    }

    pub fn scatter(&self) -> &ScatterVector {
        &self.scatter
    }

    /// Current displayed positions, index-aligned with the rest geometry.
    pub fn positions(&self) -> &[Vec3] {
        &self.display
    }

    /// Displayed positions as raw bytes for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.display)
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn style(&self) -> PointStyle {
        self.style
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Where particle `i` is heading this frame.
    pub fn target(&self, i: usize, explosion: f32, elapsed: f32) -> Option<Vec3> {
        let rest = *self.rest.points().get(i)?;
        let offset = *self.scatter.offsets().get(i)?;
        Some(rest + offset * explosion + ambient_drift(rest, elapsed, self.params.drift_phase))
    }

    /// Advance one render tick.
    pub fn advance(&mut self, time: FrameTime, signal: &ControlSignal) -> RotationDelta {
        let dt = time.step();
        let openness = effective_openness(signal, time.elapsed);
        let explosion = explosion_factor(openness);
        self.style.size = self.params.base_size + openness * SIZE_OPENNESS_GAIN;

        let k = approach_factor(self.params.lerp_rate, dt);
        if k > 0.0 {
            let phase = self.params.drift_phase;
            let targets = self.rest.points().iter().zip(self.scatter.offsets());
            for (pos, (&rest, &offset)) in self.display.iter_mut().zip(targets) {
                let target = rest + offset * explosion + ambient_drift(rest, time.elapsed, phase);
                *pos += (target - *pos) * k;
            }
        }

        self.rotate(dt, signal)
    }

    fn rotate(&mut self, dt: f32, signal: &ControlSignal) -> RotationDelta {
        // Without a hand the tilt relaxes to neutral instead of holding the
        // last detected pose.
        let (rx, ry) = if signal.is_detected {
            (signal.rotation_x, signal.rotation_y)
        } else {
            (0.0, 0.0)
        };
        let before = self.rotation;
        let pull = approach_factor(1.0, dt);
        self.rotation.y += dt * self.params.idle_spin;
        self.rotation.y += (rx * self.params.tilt_gain_y - self.rotation.y) * pull;
        self.rotation.x += (ry * self.params.tilt_gain_x - self.rotation.x) * pull;
        RotationDelta {
            x: self.rotation.x - before.x,
            y: self.rotation.y - before.y,
        }
    }
}
