//! The glowing ornament crowning the tree.

use glam::Vec3;
use smallvec::{smallvec, SmallVec};

use crate::clock::FrameTime;
use crate::constants::{
    BEACON_BOB_AMPLITUDE, BEACON_BOB_FREQ, BEACON_CORE_SPIN, BEACON_FLARE_SPIN, BEACON_HEIGHT,
    BEACON_LIGHT_INTENSITY,
};
use crate::palette::Rgb;
use crate::signal::ControlSignal;
use crate::state::{LayerTransform, PointStyle};

#[derive(Clone, Debug)]
pub struct BeaconCluster {
    pub name: &'static str,
    pub points: SmallVec<[Vec3; 4]>,
    pub color: Rgb,
    pub style: PointStyle,
    /// Spin around the view axis in rad/s; 0 keeps the cluster static.
    pub spin: f32,
    /// Current spin angle.
    pub angle: f32,
}

impl BeaconCluster {
    fn single(name: &'static str, color: [f32; 3], size: f32, opacity: f32, spin: f32) -> Self {
        Self {
            name,
            points: smallvec![Vec3::ZERO],
            color: Rgb(color),
            style: PointStyle {
                size,
                opacity,
                additive: true,
            },
            spin,
            angle: 0.0,
        }
    }
}

/// Concentric point clusters with a co-located light whose intensity follows
/// the effective openness.
#[derive(Clone, Debug)]
pub struct Beacon {
    pub clusters: SmallVec<[BeaconCluster; 3]>,
    pub transform: LayerTransform,
    pub light_color: Rgb,
    pub light_intensity: f32,
    /// Animation time; only advances while frames carry a nonzero delta.
    clock: f32,
}

impl Beacon {
    pub fn new() -> Self {
        let clusters = smallvec![
            BeaconCluster::single("core", [1.0, 1.0, 1.0], 3.8, 0.9, BEACON_CORE_SPIN),
            BeaconCluster::single("flare", [1.0, 0.922, 0.553], 8.5, 0.4, BEACON_FLARE_SPIN),
            BeaconCluster::single("glow", [1.0, 0.843, 0.0], 12.0, 0.08, 0.0),
        ];
        Self {
            clusters,
            transform: LayerTransform {
                translation: Vec3::new(0.0, BEACON_HEIGHT, 0.0),
                ..LayerTransform::default()
            },
            light_color: Rgb([1.0, 0.984, 0.878]),
            light_intensity: BEACON_LIGHT_INTENSITY,
            clock: 0.0,
        }
    }

    /// Brightness/scale multiplier for the current signal.
    pub fn power(signal: &ControlSignal, elapsed: f32) -> f32 {
        if signal.is_detected {
            0.9 + signal.openness.clamp(0.0, 1.0) * 0.6
        } else {
            1.0 + (elapsed * 1.2).sin() * 0.05
        }
    }

    pub fn advance(&mut self, time: FrameTime, signal: &ControlSignal) {
        let dt = time.step();
        if dt == 0.0 {
            return;
        }
        self.clock += dt;
        let t = self.clock;
        let power = Self::power(signal, t);
        let bob = (t * BEACON_BOB_FREQ).sin() * BEACON_BOB_AMPLITUDE;
        self.transform.translation.y = BEACON_HEIGHT + bob;
        self.transform.scale = power;
        self.light_intensity = BEACON_LIGHT_INTENSITY * power;
        for cluster in self.clusters.iter_mut() {
            cluster.angle = t * cluster.spin;
        }
    }

    /// Color and style of one cluster as lit by the beacon's light: tinted by
    /// `light_color`, opacity scaled by the current intensity.
    pub fn lit_cluster(&self, index: usize) -> Option<(Rgb, PointStyle)> {
        let cluster = self.clusters.get(index)?;
        let gain = self.light_intensity / BEACON_LIGHT_INTENSITY;
        let [r, g, b] = cluster.color.to_array();
        let [lr, lg, lb] = self.light_color.to_array();
        let style = PointStyle {
            opacity: (cluster.style.opacity * gain).clamp(0.0, 1.0),
            ..cluster.style
        };
        Some((Rgb([r * lr, g * lg, b * lb]), style))
    }

    /// Model matrix of one cluster, spin included.
    pub fn cluster_transform(&self, index: usize) -> Option<LayerTransform> {
        let cluster = self.clusters.get(index)?;
        Some(LayerTransform {
            rotation: Vec3::new(0.0, 0.0, cluster.angle),
            ..self.transform
        })
    }
}

impl Default for Beacon {
    fn default() -> Self {
        Self::new()
    }
}
