//! Composition of every layer into one scene.
//!
//! The tree body is one volumetric layer per [`ShapeCategory`], wrapped by a
//! ribbon layer and crowned by the [`Beacon`]. Each layer draws its geometry
//! from its own RNG stream; once built, layers only share the read-only
//! control signal.

use glam::Vec3;
use rand::prelude::*;

use crate::ambient::{Snowfall, Starfield};
use crate::beacon::Beacon;
use crate::clock::FrameTime;
use crate::constants::{
    DEFAULT_PARTICLE_COUNT, RIBBON_FRACTION, RIBBON_IDLE_SPIN, RIBBON_OPACITY, RIBBON_POINT_SIZE,
    SCATTER_EXTENT, SIGNAL_SMOOTHING_ALPHA, SNOWFALL_COUNT, SNOW_SIZE_MULTIPLIER,
    STARFIELD_COUNT, TREE_OFFSET, TREE_SCALE,
};
use crate::palette::{LayerKind, Palette, ShapeCategory};
use crate::shape::{generate, scatter, ShapeMode, ShapeParams};
use crate::signal::{ControlSignal, SignalCell};
use crate::solver::{ParticleLayer, SolverParams};
use crate::state::LayerTransform;

#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Particles shared by the tree layers and the ribbon.
    pub particle_count: usize,
    /// Share of `particle_count` given to the ribbon.
    pub ribbon_fraction: f32,
    pub scatter_extent: f32,
    pub shape: ShapeParams,
    pub solver: SolverParams,
    pub palette: Palette,
    /// Smoothing factor for the perception pipeline.
    pub smoothing_alpha: f32,
    pub starfield_count: usize,
    pub snowfall_count: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            ribbon_fraction: RIBBON_FRACTION,
            scatter_extent: SCATTER_EXTENT,
            shape: ShapeParams::default(),
            solver: SolverParams::default(),
            palette: Palette::default(),
            smoothing_alpha: SIGNAL_SMOOTHING_ALPHA,
            starfield_count: STARFIELD_COUNT,
            snowfall_count: SNOWFALL_COUNT,
        }
    }
}

impl SceneConfig {
    /// Particles given to the ribbon.
    pub fn ribbon_count(&self) -> usize {
        (self.particle_count as f32 * self.ribbon_fraction.clamp(0.0, 1.0)).floor() as usize
    }

    /// Particles given to each tree category.
    pub fn count_per_category(&self) -> usize {
        let core = self.particle_count - self.ribbon_count().min(self.particle_count);
        core / ShapeCategory::ALL.len()
    }
}

/// A particle layer tagged with the palette slot it is drawn with.
#[derive(Clone, Debug)]
pub struct SceneLayer {
    pub kind: LayerKind,
    pub layer: ParticleLayer,
}

pub struct Scene {
    pub layers: Vec<SceneLayer>,
    pub beacon: Beacon,
    pub starfield: Starfield,
    pub snowfall: Snowfall,
    pub palette: Palette,
    /// Placement of the tree group (layers and beacon) in the world.
    pub group: LayerTransform,
    shape: ShapeParams,
    solver: SolverParams,
    scatter_extent: f32,
    rng: StdRng,
}

impl Scene {
    pub fn new(config: SceneConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let per_category = config.count_per_category();
        let mut layers = Vec::with_capacity(ShapeCategory::ALL.len() + 1);

        for (i, category) in ShapeCategory::ALL.into_iter().enumerate() {
            let mut layer_rng = layer_rng(seed, i);
            let mut params = config.solver.clone();
            params.drift_phase = i as f32 * 1.3;
            if category == ShapeCategory::Snow {
                params.base_size *= SNOW_SIZE_MULTIPLIER;
            }
            layers.push(SceneLayer {
                kind: LayerKind::Tree(category),
                layer: build_layer(
                    ShapeMode::Volumetric,
                    per_category,
                    &config.shape,
                    config.scatter_extent,
                    params,
                    &mut layer_rng,
                ),
            });
        }

        let ribbon_params = SolverParams {
            idle_spin: RIBBON_IDLE_SPIN,
            base_size: RIBBON_POINT_SIZE,
            opacity: RIBBON_OPACITY,
            drift_phase: ShapeCategory::ALL.len() as f32 * 1.3,
            ..config.solver.clone()
        };
        let mut ribbon_rng = layer_rng(seed, ShapeCategory::ALL.len());
        layers.push(SceneLayer {
            kind: LayerKind::Ribbon,
            layer: build_layer(
                ShapeMode::Ribbon,
                config.ribbon_count(),
                &config.shape,
                config.scatter_extent,
                ribbon_params,
                &mut ribbon_rng,
            ),
        });

        let starfield = Starfield::new(config.starfield_count, &mut rng);
        let snowfall = Snowfall::new(config.snowfall_count, &mut rng);

        log::info!(
            "[scene] {} tree layers x {} particles, ribbon {}, stars {}, snow {}",
            ShapeCategory::ALL.len(),
            per_category,
            config.ribbon_count(),
            config.starfield_count,
            config.snowfall_count
        );

        Self {
            layers,
            beacon: Beacon::new(),
            starfield,
            snowfall,
            palette: config.palette,
            group: LayerTransform {
                translation: TREE_OFFSET,
                scale: TREE_SCALE,
                ..LayerTransform::default()
            },
            shape: config.shape,
            solver: config.solver,
            scatter_extent: config.scatter_extent,
            rng,
        }
    }

    /// Build a scene from a random seed.
    pub fn unseeded(config: SceneConfig) -> Self {
        Self::new(config, rand::random())
    }

    /// A standalone layer using this scene's shape and solver parameters.
    /// It is not added to the scene.
    pub fn create_layer(&mut self, mode: ShapeMode, count: usize) -> ParticleLayer {
        let mut params = self.solver.clone();
        if mode == ShapeMode::Ribbon {
            params.idle_spin = RIBBON_IDLE_SPIN;
            params.base_size = RIBBON_POINT_SIZE;
            params.opacity = RIBBON_OPACITY;
        }
        let mut layer_rng = StdRng::seed_from_u64(self.rng.gen());
        build_layer(mode, count, &self.shape, self.scatter_extent, params, &mut layer_rng)
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&ParticleLayer> {
        self.layers.iter().find(|l| l.kind == kind).map(|l| &l.layer)
    }

    pub fn particle_count(&self) -> usize {
        self.layers.iter().map(|l| l.layer.len()).sum()
    }

    /// Advance every layer with one snapshot of the shared signal.
    pub fn advance(&mut self, time: FrameTime, cell: &SignalCell) -> ControlSignal {
        let signal = cell.snapshot();
        self.advance_with(time, &signal);
        signal
    }

    pub fn advance_with(&mut self, time: FrameTime, signal: &ControlSignal) {
        for l in self.layers.iter_mut() {
            l.layer.advance(time, signal);
        }
        self.beacon.advance(time, signal);
        self.snowfall.advance(time);
    }

    /// World-space center of the beacon, for placing its light.
    pub fn beacon_world_position(&self) -> Vec3 {
        self.group
            .model_matrix()
            .transform_point3(self.beacon.transform.translation)
    }
}

fn layer_rng(seed: u64, index: usize) -> StdRng {
    let mix = seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(mix)
}

fn build_layer(
    mode: ShapeMode,
    count: usize,
    shape: &ShapeParams,
    scatter_extent: f32,
    params: SolverParams,
    rng: &mut StdRng,
) -> ParticleLayer {
    let rest = generate(count, mode, shape, rng);
    let offsets = scatter(count, scatter_extent, rng);
    ParticleLayer::new(mode, rest, offsets, params)
}
