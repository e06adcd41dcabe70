use glam::Vec3;

// Shared tuning constants for the tree, the gesture pipeline and the solver.

// Tree silhouette
pub const TREE_HEIGHT: f32 = 12.0; // apex at +H/2, base at -H/2
pub const TREE_BASE_RADIUS: f32 = 5.0;
pub const TREE_DEPTH_EXPONENT: f32 = 0.4; // < 1 pushes mass toward the base
pub const TREE_JITTER: f32 = 0.5; // full width of the per-axis jitter

// Ribbon helix wrapped around the tree
pub const RIBBON_EXPONENT: f32 = 0.55;
pub const RIBBON_TURNS: f32 = 7.5;
pub const RIBBON_RADIUS: f32 = 5.8;
pub const RIBBON_RADIUS_OFFSET: f32 = 0.3;
pub const RIBBON_FRACTION: f32 = 0.12; // share of the particle budget

// Scatter vectors
pub const SCATTER_EXTENT: f32 = 12.0; // full width of each scatter component

// Landmark indices (21-point hand model)
pub const LANDMARK_COUNT: usize = 21;
pub const WRIST: usize = 0;
pub const FINGERTIPS: [usize; 5] = [4, 8, 12, 16, 20];

// Openness normalization in image-space units
pub const OPENNESS_MIN_CLOSED: f32 = 0.2;
pub const OPENNESS_MAX_OPEN: f32 = 0.45;
pub const OPEN_THRESHOLD: f32 = 0.5;

// Observation used whenever no hand is seen
pub const FALLBACK_OPENNESS: f32 = 0.5;

// Temporal smoothing (new = old + (raw - old) * α)
pub const SIGNAL_SMOOTHING_ALPHA: f32 = 0.2;

// Idle breathing when no hand is detected
pub const IDLE_BREATH_FREQ: f32 = 0.45; // rad/s
pub const IDLE_BREATH_AMPLITUDE: f32 = 0.05;
pub const IDLE_BREATH_CENTER: f32 = 0.05;

// Ambient drift
pub const DRIFT_FREQ_X: f32 = 0.5;
pub const DRIFT_FREQ_Y: f32 = 0.35;
pub const DRIFT_SPATIAL: f32 = 0.4;
pub const DRIFT_AMPLITUDE_X: f32 = 0.05;
pub const DRIFT_AMPLITUDE_Y: f32 = 0.025;

// Solver rates
pub const POSITION_LERP_RATE: f32 = 3.5; // per second
pub const TREE_IDLE_SPIN: f32 = 0.03; // rad/s
pub const RIBBON_IDLE_SPIN: f32 = 0.08; // rad/s
pub const TILT_GAIN_Y: f32 = 0.08; // rotation_x -> yaw
pub const TILT_GAIN_X: f32 = 0.05; // rotation_y -> pitch

// Point sizing
pub const TREE_POINT_SIZE: f32 = 1.2;
pub const RIBBON_POINT_SIZE: f32 = 1.5;
pub const SNOW_SIZE_MULTIPLIER: f32 = 1.5;
pub const SIZE_OPENNESS_GAIN: f32 = 6.0;
pub const TREE_OPACITY: f32 = 0.4;
pub const RIBBON_OPACITY: f32 = 0.45;

// Beacon ornament
pub const BEACON_HEIGHT: f32 = 6.2;
pub const BEACON_BOB_FREQ: f32 = 1.5;
pub const BEACON_BOB_AMPLITUDE: f32 = 0.15;
pub const BEACON_CORE_SPIN: f32 = 0.4;
pub const BEACON_FLARE_SPIN: f32 = -0.2;
pub const BEACON_LIGHT_INTENSITY: f32 = 1.5;

// Scene layout
pub const DEFAULT_PARTICLE_COUNT: usize = 9000;
pub const TREE_OFFSET: Vec3 = Vec3::new(0.0, -0.8, 0.0);
pub const TREE_SCALE: f32 = 1.3;

// Ambient fields
pub const STARFIELD_COUNT: usize = 800;
pub const STARFIELD_MIN_RADIUS: f32 = 90.0;
pub const STARFIELD_RADIUS_SPAN: f32 = 30.0;
pub const SNOWFALL_COUNT: usize = 1200;
pub const SNOWFALL_HALF_EXTENT: f32 = 40.0;
pub const SNOWFALL_SPEED: f32 = 2.4; // units per second
pub const SNOWFALL_SWAY: f32 = 0.6;
