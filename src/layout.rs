//! Once-per-run derivation of the mine layout from the seeds.
//!
//! All random placement (working face, pit centers, dump sectors, ramps)
//! happens here, drawn from explicit `ChaCha8Rng`s in a fixed order. The
//! field generators only ever read the result.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::MineConfig;
use crate::dump::{build_dump_sectors, DumpSector};
use crate::noise_field::NoiseField;
use crate::pit::{generate_pit_centers, PitCenter, RampSet};
use crate::seeds::MineSeeds;

/// Immutable placement data shared by every field generator.
#[derive(Clone, Debug)]
pub struct MineLayout {
    /// Reference angle for the road exit and preferred dump placement
    pub working_face_angle: f64,
    pub pit_centers: Vec<PitCenter>,
    pub dump_sectors: Vec<DumpSector>,
    pub branch_ramps: RampSet,
    pub secondary_ramps: RampSet,
}

impl MineLayout {
    /// Derive the layout. Draws from the layout stream in this order:
    /// working face angle, satellite pit centers, main dump sectors, small
    /// dump sectors. Each ramp list has its own stream.
    pub fn derive(config: &MineConfig, seeds: &MineSeeds, noise: &NoiseField) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seeds.layout);

        let working_face_angle = rng.gen_range(-PI..PI);
        let pit_centers = generate_pit_centers(config, &mut rng);
        let dump_sectors = build_dump_sectors(config, working_face_angle, &mut rng);

        let branch_ramps = RampSet::generate_jittered(
            config.branch_ramp_count,
            config.branch_angle_spread_deg.to_radians(),
            config.branch_length_factor,
            config.branch_ramp_flatten,
            noise,
            &mut ChaCha8Rng::seed_from_u64(seeds.branch_ramps),
        );
        let secondary_ramps = RampSet::generate(
            config.secondary_ramp_count,
            config.secondary_ramp_arc_deg.to_radians(),
            config.secondary_ramp_length,
            config.secondary_ramp_flatten,
            &mut ChaCha8Rng::seed_from_u64(seeds.secondary_ramps),
        );

        log::debug!(
            "layout: working face {:.3} rad, {} pit centers, {} dump sectors, {}+{} ramps",
            working_face_angle,
            pit_centers.len(),
            dump_sectors.len(),
            branch_ramps.ramps().len(),
            secondary_ramps.ramps().len(),
        );

        Self {
            working_face_angle,
            pit_centers,
            dump_sectors,
            branch_ramps,
            secondary_ramps,
        }
    }
}
