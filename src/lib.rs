//! Open-pit mine generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod config;
pub mod dump;
pub mod erosion;
pub mod export;
pub mod layout;
pub mod math;
pub mod noise_field;
pub mod pit;
pub mod plateau;
pub mod seeds;
pub mod terrain;
pub mod tilemap;

pub use config::{ConfigError, MineConfig};
pub use erosion::{relax_grid, relax_heights, ErosionPreset, RelaxParams};
pub use seeds::MineSeeds;
pub use terrain::{Heightfield, MineTerrain};
