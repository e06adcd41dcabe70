/// Shell tuning constants: window, background, and the pointer-driven hand.
///
/// Scene and solver tuning lives in `lumina_core::constants`; only values the
/// desktop front-end owns are kept here.
pub const WINDOW_TITLE: &str = "Lumina";
pub const INITIAL_WIDTH: u32 = 1280;
pub const INITIAL_HEIGHT: u32 = 800;

// Background clear color (deep night blue)
pub const CLEAR_COLOR: [f64; 3] = [0.01, 0.012, 0.03];

// Synthetic capture cadence for the pointer hand (frames per second)
pub const POINTER_CAPTURE_FPS: f32 = 30.0;

// Hand poses mapped from mouse buttons
pub const POINTER_RELAXED_OPENNESS: f32 = 0.3;
pub const POINTER_FIST_OPENNESS: f32 = 0.0;
pub const POINTER_OPEN_OPENNESS: f32 = 1.0;

// Fingertip fan (radians from straight up, thumb first)
pub const FINGER_ANGLES: [f32; 5] = [-1.1, -0.45, -0.1, 0.25, 0.6];

// Minimum vertex buffer size so empty layers still get a valid binding
pub const MIN_INSTANCE_BYTES: u64 = 12;
