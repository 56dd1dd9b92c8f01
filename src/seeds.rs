//! Seed management for mine generation
//!
//! Provides separate seeds for each derivation stage, allowing the noise field
//! to be varied independently of the pit/dump layout and vice versa.
//!
//! Sub-seeds are the first word of a fixed ChaCha8 stream per system, so a
//! master seed maps to the same mine on every toolchain and platform.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

const NOISE_STREAM: u64 = 1;
const LAYOUT_STREAM: u64 = 2;
const BRANCH_RAMPS_STREAM: u64 = 3;
const SECONDARY_RAMPS_STREAM: u64 = 4;

/// Seeds for all mine generation systems.
///
/// Each system gets its own seed, derived from a master seed by default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MineSeeds {
    /// Master seed (reported so a run can be reproduced)
    pub master: u64,
    /// Perlin source shared by every field generator
    pub noise: u64,
    /// Working face, pit centers and dump sectors
    pub layout: u64,
    /// Branch ramp angles
    pub branch_ramps: u64,
    /// Secondary ramp angles
    pub secondary_ramps: u64,
}

impl MineSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            noise: derive_seed(master, NOISE_STREAM),
            layout: derive_seed(master, LAYOUT_STREAM),
            branch_ramps: derive_seed(master, BRANCH_RAMPS_STREAM),
            secondary_ramps: derive_seed(master, SECONDARY_RAMPS_STREAM),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> MineSeedsBuilder {
        MineSeedsBuilder::new(master)
    }

    /// Seed for the Perlin permutation table.
    pub fn noise_seed(&self) -> u32 {
        (self.noise ^ (self.noise >> 32)) as u32
    }
}

/// Builder for overriding individual seeds while deriving others from master
pub struct MineSeedsBuilder {
    seeds: MineSeeds,
}

impl MineSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: MineSeeds::from_master(master),
        }
    }

    /// Override the noise seed
    pub fn noise(mut self, seed: u64) -> Self {
        self.seeds.noise = seed;
        self
    }

    /// Override the layout seed
    pub fn layout(mut self, seed: u64) -> Self {
        self.seeds.layout = seed;
        self
    }

    pub fn build(self) -> MineSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a per-system stream id.
fn derive_seed(master: u64, stream: u64) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(master);
    rng.set_stream(stream);
    rng.next_u64()
}

impl std::fmt::Display for MineSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MineSeeds {{ master: {}, noise: {}, layout: {}, branch_ramps: {}, secondary_ramps: {} }}",
            self.master, self.noise, self.layout, self.branch_ramps, self.secondary_ramps,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        let seeds1 = MineSeeds::from_master(12345);
        let seeds2 = MineSeeds::from_master(12345);
        assert_eq!(seeds1, seeds2);
    }

    #[test]
    fn test_different_systems_get_different_seeds() {
        let seeds = MineSeeds::from_master(12345);
        assert_ne!(seeds.noise, seeds.layout);
        assert_ne!(seeds.layout, seeds.branch_ramps);
        assert_ne!(seeds.branch_ramps, seeds.secondary_ramps);
    }

    #[test]
    fn test_builder_override() {
        let seeds = MineSeeds::builder(12345).layout(99999).build();
        assert_eq!(seeds.layout, 99999);

        let default_seeds = MineSeeds::from_master(12345);
        assert_eq!(seeds.noise, default_seeds.noise);
        assert_eq!(seeds.branch_ramps, default_seeds.branch_ramps);
    }

    #[test]
    fn test_sub_seeds_follow_chacha_streams() {
        let seeds = MineSeeds::from_master(12345);
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        rng.set_stream(LAYOUT_STREAM);
        assert_eq!(seeds.layout, rng.next_u64());

        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        rng.set_stream(NOISE_STREAM);
        assert_eq!(seeds.noise, rng.next_u64());
    }

    #[test]
    fn test_different_masters_get_different_seeds() {
        let a = MineSeeds::from_master(1);
        let b = MineSeeds::from_master(2);
        assert_ne!(a.noise, b.noise);
        assert_ne!(a.layout, b.layout);
        assert_ne!(a.secondary_ramps, b.secondary_ramps);
    }
}
