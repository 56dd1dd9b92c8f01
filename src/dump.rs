//! Overburden dump generator
//!
//! Dumps are angular wedges outside the primary pit rim. Each wedge is
//! terraced into benches no steeper than the angle of repose, loses the
//! occasional bench to a landslide, and fades out toward its outer extent
//! and its angular edges.

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MineConfig;
use crate::math::{angle_diff, lerp, polar, safe_ratio, smoothstep, EPSILON};
use crate::noise_field::{channel, NoiseField};
use crate::pit::PitField;

/// One angular dump wedge, anchored at the primary pit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DumpSector {
    /// Wedge axis in radians
    pub center_angle: f64,
    /// Angular half-width in radians
    pub half_width: f64,
    pub max_height: f64,
    /// Reach beyond the pit rim
    pub extent: f64,
    /// Relative weight (main dumps 1.0, small dumps 0.6 by default)
    pub weight: f64,
}

/// Main sectors first, then small ones.
///
/// A main sector draws: placement coin, angle (face-biased or uniform),
/// width, height, extent. A small sector draws angle, width, height, extent.
/// Explicit sectors consume no draws.
pub fn build_dump_sectors<R: Rng>(config: &MineConfig, working_face_angle: f64, rng: &mut R) -> Vec<DumpSector> {
    if let Some(explicit) = &config.explicit_dump_sectors {
        return explicit.clone();
    }

    let mut sectors = Vec::with_capacity(config.dump_main_count + config.dump_small_count);
    let face_spread = config.dump_face_spread_deg.to_radians();

    for _ in 0..config.dump_main_count {
        let center_angle = if rng.gen::<f64>() < config.dump_placement_bias {
            working_face_angle + rng.gen_range(-face_spread..=face_spread)
        } else {
            rng.gen_range(-PI..PI)
        };
        let half_width = (config.dump_main_sector_deg * 0.5 * rng.gen_range(0.9..1.1)).to_radians();
        let max_height = config.dump_max_height * rng.gen_range(0.85..1.12);
        let extent = config.dump_extent * rng.gen_range(0.8..1.15);
        sectors.push(DumpSector {
            center_angle,
            half_width,
            max_height,
            extent,
            weight: config.dump_main_weight,
        });
    }

    for _ in 0..config.dump_small_count {
        let center_angle = rng.gen_range(-PI..PI);
        let half_width = (config.dump_small_sector_deg * 0.5 * rng.gen_range(0.6..1.1)).to_radians();
        let max_height = config.dump_max_height * rng.gen_range(0.20..0.65);
        let extent = config.dump_extent * rng.gen_range(0.45..0.9);
        sectors.push(DumpSector {
            center_angle,
            half_width,
            max_height,
            extent,
            weight: config.dump_small_weight,
        });
    }

    sectors
}

/// Overburden height field over all dump sectors.
#[derive(Clone)]
pub struct DumpField {
    config: MineConfig,
    noise: NoiseField,
    sectors: Vec<DumpSector>,
    tan_repose: f64,
}

impl DumpField {
    pub fn new(config: &MineConfig, noise: NoiseField, sectors: Vec<DumpSector>) -> Self {
        Self {
            config: config.clone(),
            noise,
            sectors,
            tan_repose: config.tan_repose().max(EPSILON),
        }
    }

    pub fn sectors(&self) -> &[DumpSector] {
        &self.sectors
    }

    pub fn tan_repose(&self) -> f64 {
        self.tan_repose
    }

    /// Horizontal width of one dump bench; a riser of one bench height never
    /// exceeds the repose slope.
    pub fn bench_width(&self) -> f64 {
        self.config
            .dump_min_bench_width
            .max(self.config.dump_bench_height / self.tan_repose)
    }

    /// Tallest sector contribution at `(x, y)`, or `None` when no sector covers it.
    pub fn height_at(&self, pit: &PitField, x: f64, y: f64) -> Option<f64> {
        let origin = pit.primary_center();
        let (r, theta) = polar(x, y, origin.x, origin.y);
        let distance_out = r - pit.primary_rim_radius(theta);
        if distance_out <= 0.0 {
            return None;
        }

        self.sectors
            .iter()
            .filter_map(|sector| self.sector_height(sector, x, y, theta, distance_out))
            .reduce(f64::max)
    }

    /// Contribution of one sector at a point `distance_out` beyond the rim.
    pub fn sector_height(
        &self,
        sector: &DumpSector,
        x: f64,
        y: f64,
        theta: f64,
        distance_out: f64,
    ) -> Option<f64> {
        let cfg = &self.config;
        if distance_out <= 0.0 || distance_out > sector.extent {
            return None;
        }

        let d = angle_diff(theta, sector.center_angle).abs();
        if d >= sector.half_width {
            return None;
        }
        let angular = smoothstep(1.0 - safe_ratio(d, sector.half_width));
        if angular <= 0.0 {
            return None;
        }

        let ceiling = distance_out * self.tan_repose;
        let capped_height = sector.max_height.min(ceiling);

        let bench_width = self.bench_width();
        let bench_count = (sector.extent / bench_width).ceil().max(1.0) as usize;
        let bench_index = ((distance_out / bench_width).floor() as usize).min(bench_count - 1);
        let base = (bench_index + 1) as f64 / bench_count as f64 * capped_height;

        let idx = bench_index as f64;
        let n = self.noise.fbm(
            theta.cos() * 0.9 + idx * 0.21,
            theta.sin() * 0.9 + idx * 0.24,
            channel::DUMP_LANDSLIDE + idx * 7.0,
            2,
        );
        let p = n * 0.5 + 0.5;
        let threshold = cfg.dump_landslide_threshold;
        let landslide = if p > threshold {
            let severity = safe_ratio(p - threshold, 1.0 - threshold).clamp(0.0, 1.0);
            lerp(1.0, cfg.dump_landslide_reduction, smoothstep(severity))
        } else {
            1.0
        };

        let surface = self.noise.fbm(
            (x + 123.4) * 0.02,
            (y - 91.2) * 0.02,
            channel::DUMP_SURFACE + idx,
            3,
        ) * (cfg.dump_noise_variation * 0.5);

        let radial = smoothstep(1.0 - distance_out / sector.extent);
        let height = (base * landslide + surface) * radial * angular * sector.weight;

        Some(height.clamp(0.0, ceiling) * cfg.vertical_scale)
    }
}
