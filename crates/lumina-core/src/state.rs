//! Visual-side state handed to the renderer.
//!
//! These types avoid any platform API. The renderer reads them to build
//! matrices and point pipelines; the core only writes them.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Right-handed perspective camera.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera framing the whole tree from slightly above its center.
    pub fn framing_tree(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 6.0, 30.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: 42f32.to_radians(),
            znear: 0.1,
            zfar: 400.0,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Size, opacity and blend mode for one points draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointStyle {
    pub size: f32,
    pub opacity: f32,
    pub additive: bool,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            size: 1.0,
            opacity: 1.0,
            additive: true,
        }
    }
}

/// Rotation (radians, applied Y then X then Z), translation and uniform scale
/// of a layer or ornament.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerTransform {
    pub rotation: Vec3,
    pub translation: Vec3,
    pub scale: f32,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl LayerTransform {
    pub fn model_matrix(&self) -> Mat4 {
        let r = self.rotation;
        let rot = Quat::from_euler(EulerRot::YXZ, r.y, r.x, r.z);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rot, self.translation)
    }

    /// Apply `parent` after `self`.
    pub fn within(&self, parent: &LayerTransform) -> Mat4 {
        parent.model_matrix() * self.model_matrix()
    }
}
