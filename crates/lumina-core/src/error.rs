use thiserror::Error;

use crate::palette::LayerKind;

/// Failures reported by a [`PerceptionSource`](crate::PerceptionSource).
///
/// None of these are fatal: the runtime logs them and the scene falls back to
/// its idle signal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerceptionError {
    /// The capture device or inference backend could not be initialized.
    #[error("perception unavailable: {0}")]
    Unavailable(String),
    /// A running source failed while producing frames.
    #[error("capture failed: {0}")]
    Capture(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("palette has no color for {0:?}")]
    MissingColor(LayerKind),
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}
