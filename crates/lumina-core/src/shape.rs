//! Procedural rest geometry for the particle layers.
//!
//! Generators are pure functions of a count, a shape mode, its parameters and
//! a caller-supplied RNG. Seed the RNG for reproducible output.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::constants::{
    RIBBON_EXPONENT, RIBBON_RADIUS, RIBBON_RADIUS_OFFSET, RIBBON_TURNS, TREE_BASE_RADIUS,
    TREE_DEPTH_EXPONENT, TREE_HEIGHT, TREE_JITTER,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeMode {
    /// Particles filling a cone, denser toward the base.
    Volumetric,
    /// Particles along a helix wrapping the cone.
    Ribbon,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeParams {
    pub height: f32,
    pub base_radius: f32,
    /// Exponent applied to the uniform depth draw; below 1 favors the base.
    pub depth_exponent: f32,
    /// Full width of the uniform per-axis jitter.
    pub jitter: f32,
    /// Exponent reshaping the ribbon's linear parameter.
    pub ribbon_exponent: f32,
    pub ribbon_turns: f32,
    pub ribbon_radius: f32,
    pub ribbon_radius_offset: f32,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            height: TREE_HEIGHT,
            base_radius: TREE_BASE_RADIUS,
            depth_exponent: TREE_DEPTH_EXPONENT,
            jitter: TREE_JITTER,
            ribbon_exponent: RIBBON_EXPONENT,
            ribbon_turns: RIBBON_TURNS,
            ribbon_radius: RIBBON_RADIUS,
            ribbon_radius_offset: RIBBON_RADIUS_OFFSET,
        }
    }
}

impl ShapeParams {
    /// Vertical span of the shape before jitter, as (base, apex).
    pub fn y_range(&self) -> (f32, f32) {
        (-self.height * 0.5, self.height * 0.5)
    }

    /// Largest planar radius a volumetric point can reach, jitter included.
    pub fn max_planar_radius(&self) -> f32 {
        self.base_radius + self.jitter_bound() * std::f32::consts::SQRT_2
    }

    /// Largest per-axis jitter offset.
    #[inline]
    pub fn jitter_bound(&self) -> f32 {
        self.jitter * 0.5
    }

    #[inline]
    fn height_at(&self, t: f32) -> f32 {
        (1.0 - t) * self.height - self.height * 0.5
    }
}

/// Index-aligned home positions of one layer. Never mutated after creation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestGeometry {
    points: Vec<Vec3>,
}

impl RestGeometry {
    pub fn from_points(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Generate `count` rest positions. A zero count yields an empty geometry.
pub fn generate<R: Rng + ?Sized>(
    count: usize,
    mode: ShapeMode,
    params: &ShapeParams,
    rng: &mut R,
) -> RestGeometry {
    let points = match mode {
        ShapeMode::Volumetric => (0..count).map(|_| volumetric_point(params, rng)).collect(),
        ShapeMode::Ribbon => (0..count).map(|i| ribbon_point(i, count, params)).collect(),
    };
    RestGeometry { points }
}

fn volumetric_point<R: Rng + ?Sized>(params: &ShapeParams, rng: &mut R) -> Vec3 {
    let t = rng.gen::<f32>().powf(params.depth_exponent);
    let y = params.height_at(t);
    let bound = t * params.base_radius;
    let angle = rng.gen::<f32>() * TAU;
    // sqrt keeps the disc area-uniform instead of piling points at the axis
    let r = rng.gen::<f32>().sqrt() * bound;
    let j = params.jitter;
    let jitter = Vec3::new(
        (rng.gen::<f32>() - 0.5) * j,
        (rng.gen::<f32>() - 0.5) * j,
        (rng.gen::<f32>() - 0.5) * j,
    );
    Vec3::new(angle.cos() * r, y, angle.sin() * r) + jitter
}

fn ribbon_point(i: usize, count: usize, params: &ShapeParams) -> Vec3 {
    let t_lin = i as f32 / count as f32;
    let t = t_lin.powf(params.ribbon_exponent);
    let y = params.height_at(t);
    let angle = t * params.ribbon_turns * TAU;
    let radius = t * params.ribbon_radius + params.ribbon_radius_offset;
    Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}

/// Per-particle offsets reached at full explosion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScatterVector {
    offsets: Vec<Vec3>,
}

impl ScatterVector {
    pub fn from_offsets(offsets: Vec<Vec3>) -> Self {
        Self { offsets }
    }

    pub fn offsets(&self) -> &[Vec3] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// `count` offsets with each component uniform in \[-extent/2, extent/2\].
pub fn scatter<R: Rng + ?Sized>(count: usize, extent: f32, rng: &mut R) -> ScatterVector {
    let offsets = (0..count)
        .map(|_| {
            Vec3::new(
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
            )
        })
        .collect();
    ScatterVector { offsets }
}
