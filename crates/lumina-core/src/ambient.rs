//! Background fields that ignore the gesture signal.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::clock::FrameTime;
use crate::constants::{
    SNOWFALL_HALF_EXTENT, SNOWFALL_SPEED, SNOWFALL_SWAY, STARFIELD_MIN_RADIUS,
    STARFIELD_RADIUS_SPAN,
};
use crate::state::PointStyle;

/// Static stars scattered over a distant spherical shell.
#[derive(Clone, Debug)]
pub struct Starfield {
    points: Vec<Vec3>,
    pub style: PointStyle,
}

impl Starfield {
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let points = (0..count)
            .map(|_| {
                let r = STARFIELD_MIN_RADIUS + rng.gen::<f32>() * STARFIELD_RADIUS_SPAN;
                let theta = rng.gen::<f32>() * TAU;
                // uniform on the sphere rather than clustered at the poles
                let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
                Vec3::new(
                    r * phi.sin() * theta.cos(),
                    r * phi.sin() * theta.sin(),
                    r * phi.cos(),
                )
            })
            .collect();
        Self {
            points,
            style: PointStyle {
                size: 0.05,
                opacity: 0.3,
                additive: true,
            },
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.points
    }
}

/// Flakes drifting down through a cube and wrapping back to the top.
#[derive(Clone, Debug)]
pub struct Snowfall {
    points: Vec<Vec3>,
    pub style: PointStyle,
}

impl Snowfall {
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let extent = SNOWFALL_HALF_EXTENT * 2.0;
        let points = (0..count)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f32>() - 0.5) * extent,
                    (rng.gen::<f32>() - 0.5) * extent,
                    (rng.gen::<f32>() - 0.5) * extent,
                )
            })
            .collect();
        Self {
            points,
            style: PointStyle {
                size: 0.12,
                opacity: 0.4,
                additive: true,
            },
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.points
    }

    pub fn advance(&mut self, time: FrameTime) {
        let dt = time.step();
        if dt == 0.0 {
            return;
        }
        let h = SNOWFALL_HALF_EXTENT;
        for (i, p) in self.points.iter_mut().enumerate() {
            p.y -= SNOWFALL_SPEED * dt;
            if p.y < -h {
                p.y = h;
            }
            p.x += (time.elapsed * 0.4 + i as f32).sin() * SNOWFALL_SWAY * dt;
        }
    }
}
