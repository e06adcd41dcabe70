pub mod ambient;
pub mod beacon;
pub mod clock;
pub mod constants;
pub mod error;
pub mod gesture;
pub mod palette;
pub mod perception;
pub mod scene;
pub mod shape;
pub mod signal;
pub mod solver;
pub mod state;
pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");

pub use ambient::*;
pub use beacon::*;
pub use clock::*;
pub use constants::*;
pub use error::*;
pub use gesture::*;
pub use palette::*;
pub use perception::*;
pub use scene::*;
pub use shape::*;
pub use signal::*;
pub use solver::*;
pub use state::*;
