//! Mine generation parameters and configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dump::DumpSector;
use crate::pit::PitCenter;
use crate::plateau::PlateauConfig;

/// Configuration validation and loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must lie in [0, 1], got {value}")]
    NotAFraction { name: &'static str, value: f64 },

    #[error("angle of repose must lie strictly between 0 and 90 degrees, got {0}")]
    InvalidReposeAngle(f64),

    #[error("grid resolution must be at least 3, got {0}")]
    GridTooSmall(usize),

    #[error("{0} list is empty")]
    EmptyList(&'static str),

    #[error("invalid plateau: {0}")]
    InvalidPlateau(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Flat set of named parameters controlling the whole generator.
///
/// Lengths are in world units (metres), angles in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MineConfig {
    /// Fixed seed, or `None` to draw one from system entropy
    pub seed: Option<u64>,

    // =========================================================================
    // Sampling Grid
    // =========================================================================

    /// Samples along each axis of the square grid
    pub resolution: usize,

    /// Side length of the sampled domain, centred on the origin
    pub size: f64,

    // =========================================================================
    // Pit Geometry
    // =========================================================================

    pub max_pit_radius: f64,
    pub max_depth: f64,
    pub bench_height: f64,
    pub min_bench_width: f64,
    pub mean_bench_width: f64,

    // =========================================================================
    // Road & Ramps
    // =========================================================================

    pub road_width: f64,
    /// Full turns the haul road makes between the rim and the pit centre
    pub road_spiral_turns: f64,
    /// Depth multiplier reached on the road centreline
    pub road_flatten: f64,
    pub branch_ramp_count: usize,
    pub secondary_ramp_count: usize,
    pub branch_angle_spread_deg: f64,
    /// Fraction of the radius, measured inward from the rim, a branch ramp reaches
    pub branch_length_factor: f64,
    pub branch_ramp_flatten: f64,
    pub secondary_ramp_arc_deg: f64,
    pub secondary_ramp_length: f64,
    pub secondary_ramp_flatten: f64,

    // =========================================================================
    // Bottom Working Pad
    // =========================================================================

    pub bottom_pad_radius: f64,
    /// Pad depth as a fraction of the maximum depth
    pub pad_depth_factor: f64,

    // =========================================================================
    // Bench Skips
    // =========================================================================

    /// Share of the noise range that triggers a skip
    pub bench_skip_probability: f64,
    /// Relief a fully skipped bench keeps relative to the bench above
    pub bench_skip_reduction: f64,

    // =========================================================================
    // Surface Noise
    // =========================================================================

    /// Frequency of the natural ground outside the pit
    pub ambient_noise_scale: f64,
    /// Amplitude of the gentle base surface dumps sit on
    pub ambient_noise_ampl: f64,
    /// Amplitude of the ambient value the pit itself reports outside its rim
    pub outside_pit_ampl: f64,
    pub noise_med_scale: f64,
    pub noise_high_scale: f64,
    pub micro_ampl: f64,

    // =========================================================================
    // Rim Deformation
    // =========================================================================

    pub boundary_noise_scale: f64,
    pub boundary_noise_strength: f64,
    pub boundary_fbm_octaves: u32,
    pub boundary_per_bench_variation: f64,
    /// Pull of the rim toward its undeformed radius where the road exits
    pub road_boundary_smooth: f64,
    pub road_boundary_threshold_deg: f64,

    // =========================================================================
    // Centre Preservation
    // =========================================================================

    /// Fraction of the rim radius treated as the compacted pit bottom
    pub inner_step_preserve: f64,
    pub center_jitter_reduction: f64,
    pub center_skip_reduction: f64,

    // =========================================================================
    // Multiple Pit Centers
    // =========================================================================

    pub multi_pit_count: usize,
    pub pit_spread: f64,
    /// Lower bound of the random size scale of extra pits
    pub pit_size_variation: f64,
    /// Lower bound of the random depth scale of extra pits
    pub pit_depth_variation: f64,
    pub explicit_pit_centers: Option<Vec<PitCenter>>,

    // =========================================================================
    // Overburden Dumps
    // =========================================================================

    pub dump_main_count: usize,
    pub dump_small_count: usize,
    pub dump_main_sector_deg: f64,
    pub dump_small_sector_deg: f64,
    pub dump_max_height: f64,
    pub dump_bench_height: f64,
    pub dump_min_bench_width: f64,
    pub dump_angle_of_repose_deg: f64,
    pub dump_extent: f64,
    pub dump_noise_variation: f64,
    /// Chance a main dump is placed near the working face
    pub dump_placement_bias: f64,
    pub dump_face_spread_deg: f64,
    pub dump_main_weight: f64,
    pub dump_small_weight: f64,
    pub dump_landslide_threshold: f64,
    pub dump_landslide_reduction: f64,
    pub explicit_dump_sectors: Option<Vec<DumpSector>>,

    // =========================================================================
    // Secondary Landform
    // =========================================================================

    pub plateau: Option<PlateauConfig>,

    // =========================================================================
    // Compositing & Erosion
    // =========================================================================

    /// Fraction of the rim radius where the blend toward natural ground starts
    pub rim_blend_start: f64,
    /// Width of the rim blend as a fraction of the domain size
    pub rim_blend_distance: f64,
    pub erosion_iterations: usize,
    pub erosion_rate: f64,
    /// Steepness damping: falloff = 1 / (1 + damping·|avg − centre|)
    pub erosion_steepness_damping: f64,

    /// Global vertical compression applied to every contribution
    pub vertical_scale: f64,
}

impl Default for MineConfig {
    fn default() -> Self {
        Self {
            seed: None,

            resolution: 220,
            size: 320.0,

            max_pit_radius: 110.0,
            max_depth: 60.0,
            bench_height: 6.0,
            min_bench_width: 8.0,
            mean_bench_width: 12.0,

            road_width: 12.0,
            road_spiral_turns: 4.5,
            road_flatten: 0.60,
            branch_ramp_count: 3,
            secondary_ramp_count: 4,
            branch_angle_spread_deg: 36.0,
            branch_length_factor: 0.40,
            branch_ramp_flatten: 0.38,
            secondary_ramp_arc_deg: 24.0,
            secondary_ramp_length: 0.55,
            secondary_ramp_flatten: 0.50,

            bottom_pad_radius: 30.0,
            pad_depth_factor: 0.98,

            bench_skip_probability: 0.18,
            bench_skip_reduction: 0.12,

            ambient_noise_scale: 0.0038,
            ambient_noise_ampl: 1.6,
            outside_pit_ampl: 0.72,
            noise_med_scale: 0.02,
            noise_high_scale: 0.08,
            micro_ampl: 0.12,

            boundary_noise_scale: 0.95,
            boundary_noise_strength: 0.10,
            boundary_fbm_octaves: 3,
            boundary_per_bench_variation: 0.18,
            road_boundary_smooth: 0.70,
            road_boundary_threshold_deg: 18.0,

            inner_step_preserve: 0.45,
            center_jitter_reduction: 0.18,
            center_skip_reduction: 0.65,

            multi_pit_count: 2,
            pit_spread: 38.0,
            pit_size_variation: 0.65,
            pit_depth_variation: 0.55,
            explicit_pit_centers: None,

            dump_main_count: 1,
            dump_small_count: 3,
            dump_main_sector_deg: 90.0,
            dump_small_sector_deg: 36.0,
            dump_max_height: 26.0,
            dump_bench_height: 4.5,
            dump_min_bench_width: 6.0,
            dump_angle_of_repose_deg: 34.0,
            dump_extent: 130.0,
            dump_noise_variation: 0.9,
            dump_placement_bias: 0.65,
            dump_face_spread_deg: 30.0,
            dump_main_weight: 1.0,
            dump_small_weight: 0.6,
            dump_landslide_threshold: 0.65,
            dump_landslide_reduction: 0.25,
            explicit_dump_sectors: None,

            plateau: None,

            rim_blend_start: 0.98,
            rim_blend_distance: 0.08,
            erosion_iterations: 6,
            erosion_rate: 0.42,
            erosion_steepness_damping: 6.0,

            vertical_scale: 0.55,
        }
    }
}

impl MineConfig {
    /// Load a (possibly partial) JSON configuration; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Returns the configured seed or draws a fresh one from system entropy.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Reject configurations the field math cannot represent meaningfully.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution < 3 {
            return Err(ConfigError::GridTooSmall(self.resolution));
        }

        let positive = [
            ("size", self.size),
            ("max_pit_radius", self.max_pit_radius),
            ("max_depth", self.max_depth),
            ("bench_height", self.bench_height),
            ("road_width", self.road_width),
            ("dump_bench_height", self.dump_bench_height),
            ("dump_extent", self.dump_extent),
            ("vertical_scale", self.vertical_scale),
        ];
        for (name, value) in positive {
            // NaN fails this comparison too
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        let fractions = [
            ("bench_skip_probability", self.bench_skip_probability),
            ("bench_skip_reduction", self.bench_skip_reduction),
            ("dump_placement_bias", self.dump_placement_bias),
            ("dump_landslide_threshold", self.dump_landslide_threshold),
            ("pad_depth_factor", self.pad_depth_factor),
            ("inner_step_preserve", self.inner_step_preserve),
            ("pit_size_variation", self.pit_size_variation),
            ("pit_depth_variation", self.pit_depth_variation),
            ("erosion_rate", self.erosion_rate),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::NotAFraction { name, value });
            }
        }

        let non_negative = [
            ("pit_spread", self.pit_spread),
            ("dump_face_spread_deg", self.dump_face_spread_deg),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if !(self.dump_angle_of_repose_deg > 0.0 && self.dump_angle_of_repose_deg < 90.0) {
            return Err(ConfigError::InvalidReposeAngle(self.dump_angle_of_repose_deg));
        }

        if let Some(centers) = &self.explicit_pit_centers {
            if centers.is_empty() {
                return Err(ConfigError::EmptyList("explicit_pit_centers"));
            }
            for center in centers {
                if !(center.size_scale > 0.0) {
                    return Err(ConfigError::NonPositive { name: "pit center size_scale", value: center.size_scale });
                }
                if !(center.depth_scale > 0.0) {
                    return Err(ConfigError::NonPositive { name: "pit center depth_scale", value: center.depth_scale });
                }
            }
        }

        if let Some(sectors) = &self.explicit_dump_sectors {
            if sectors.is_empty() {
                return Err(ConfigError::EmptyList("explicit_dump_sectors"));
            }
            for sector in sectors {
                if !(sector.half_width > 0.0) {
                    return Err(ConfigError::NonPositive { name: "dump sector half_width", value: sector.half_width });
                }
                if !(sector.extent > 0.0) {
                    return Err(ConfigError::NonPositive { name: "dump sector extent", value: sector.extent });
                }
            }
        }

        if let Some(plateau) = &self.plateau {
            plateau.validate()?;
        }

        if self.bottom_pad_radius > self.max_pit_radius {
            log::warn!(
                "bottom pad radius {:.1} exceeds pit radius {:.1}; the pit will read as a single pad",
                self.bottom_pad_radius,
                self.max_pit_radius
            );
        }

        Ok(())
    }

    pub fn tan_repose(&self) -> f64 {
        self.dump_angle_of_repose_deg.to_radians().tan()
    }

    /// Maximum depth of a pit with the given depth scale, before vertical compression.
    pub fn scaled_max_depth(&self, depth_scale: f64) -> f64 {
        self.max_depth * depth_scale
    }
}
