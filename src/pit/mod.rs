//! Pit field generator
//!
//! Produces the excavation depth at any point by layering, per pit center:
//! - **Terracing**: bench index from normalized inward distance
//! - **Haul road**: a spiral from the working face down to the floor
//! - **Ramps**: branch and secondary wedges flattening the walls
//! - **Bench skips**: noise-graded flattening toward the bench above
//! - **Bottom pad**: a near-maximum-depth working floor
//! - **Surface texture**: jitter and micro relief, calmer toward the centre
//!
//! Centers are combined by taking the deepest value.

pub mod centers;
pub mod ramps;
pub mod rim;

pub use centers::{generate_pit_centers, PitCenter};
pub use ramps::{Ramp, RampSet};
pub use rim::MIN_RIM_RADIUS;

use crate::config::MineConfig;
use crate::layout::MineLayout;
use crate::math::{lerp, polar, safe_ratio, smoothstep, EPSILON};
use crate::noise_field::{channel, NoiseField};

/// Excavation depth field over all pit centers.
#[derive(Clone)]
pub struct PitField {
    config: MineConfig,
    noise: NoiseField,
    centers: Vec<PitCenter>,
    working_face_angle: f64,
    branch_ramps: RampSet,
    secondary_ramps: RampSet,
}

impl PitField {
    pub fn new(config: &MineConfig, noise: NoiseField, layout: &MineLayout) -> Self {
        Self {
            config: config.clone(),
            noise,
            centers: layout.pit_centers.clone(),
            working_face_angle: layout.working_face_angle,
            branch_ramps: layout.branch_ramps.clone(),
            secondary_ramps: layout.secondary_ramps.clone(),
        }
    }

    pub fn centers(&self) -> &[PitCenter] {
        &self.centers
    }

    pub fn primary_center(&self) -> PitCenter {
        self.centers.first().copied().unwrap_or(PitCenter::PRIMARY)
    }

    pub fn working_face_angle(&self) -> f64 {
        self.working_face_angle
    }

    /// Signed elevation of the excavation at `(x, y)`; negative inside a pit.
    pub fn depth_at(&self, x: f64, y: f64) -> f64 {
        self.centers
            .iter()
            .map(|center| self.depth_for_center(x, y, center))
            .reduce(f64::min)
            .unwrap_or_else(|| self.outside_ambient(x, y))
    }

    /// Shallow natural ground reported outside every rim.
    pub fn outside_ambient(&self, x: f64, y: f64) -> f64 {
        let cfg = &self.config;
        let scale = cfg.ambient_noise_scale;
        self.noise.fbm(x * scale, y * scale, channel::AMBIENT, 4) * cfg.outside_pit_ampl * cfg.vertical_scale
    }

    /// Half a minimum bench width, the width of every edge transition.
    fn edge_blur(&self) -> f64 {
        (self.config.min_bench_width * 0.5).max(1.0)
    }

    /// Weight in [0, 1] that keeps the flat bench floor calm toward the pit centre.
    fn preserve_weight(&self, r: f64, rim: f64) -> f64 {
        let threshold = rim * self.config.inner_step_preserve;
        if threshold <= EPSILON || r >= threshold {
            return 0.0;
        }
        (1.0 - r / threshold).clamp(0.0, 1.0)
    }

    /// Relief factor of bench `index`: 1 for a normal bench, down to the skip
    /// reduction for a bench flattened into the one above.
    pub fn bench_skip_factor(&self, index: usize, theta: f64) -> f64 {
        let cfg = &self.config;
        let idx = index as f64;
        let n = self.noise.fbm(
            theta.cos() * 0.7 + idx * 0.19,
            theta.sin() * 0.7 + idx * 0.23,
            channel::BENCH_SKIP + idx * 13.0,
            2,
        );
        let p = (n * 0.5 + 0.5).clamp(0.0, 1.0);
        let threshold = 1.0 - cfg.bench_skip_probability;
        if cfg.bench_skip_probability <= 0.0 || p <= threshold {
            return 1.0;
        }
        let severity = safe_ratio(p - threshold, cfg.bench_skip_probability).clamp(0.0, 1.0);
        lerp(1.0, cfg.bench_skip_reduction, smoothstep(severity))
    }

    fn depth_for_center(&self, x: f64, y: f64, center: &PitCenter) -> f64 {
        let cfg = &self.config;
        let size_scale = center.size_scale;
        let depth_scale = center.depth_scale;
        let (r, theta) = polar(x, y, center.x, center.y);

        let rim = self.effective_radius(theta, size_scale);
        let outside = self.outside_ambient(x, y);
        if r >= rim {
            return outside;
        }

        let index = self.bench_index(r, rim, depth_scale);
        let step = cfg.bench_height * depth_scale;
        let base = index as f64 * step;
        let mut depth = base;

        let edge_blur = self.edge_blur();
        let bench_rim = self.bench_rim_radius(index, theta, size_scale, depth_scale);
        // 1 on the bench's own rim, fading to 0 half a bench width away
        let edge_weight = 1.0 - smoothstep((bench_rim - r).abs() / edge_blur);

        let road = self.road_strength(r, theta, rim);
        if road > 0.0 {
            depth *= lerp(1.0, cfg.road_flatten, road * (0.9 + 0.1 * size_scale));
        }

        depth = self.branch_ramps.apply(depth, r, theta, rim, size_scale);
        depth = self.secondary_ramps.apply(depth, r, theta, rim, size_scale);

        let preserve = self.preserve_weight(r, rim);

        let mut skip = self.bench_skip_factor(index, theta);
        skip = lerp(skip, 1.0, preserve * (1.0 - cfg.center_skip_reduction));
        if base > EPSILON {
            let above = index.saturating_sub(1) as f64 * step;
            let skipped = above + (base - above) * skip;
            depth *= skipped / base;
        }

        let pad_radius = cfg.bottom_pad_radius * size_scale;
        if r < pad_radius {
            let pad_depth = cfg.scaled_max_depth(depth_scale) * cfg.pad_depth_factor;
            depth = lerp(depth, pad_depth, smoothstep(1.0 - r / pad_radius));
        }

        let mut jitter = self.noise.fbm(
            x * cfg.noise_med_scale,
            y * cfg.noise_med_scale,
            channel::JITTER + index as f64 * 11.0,
            3,
        ) * (cfg.bench_height * 0.24);
        let mut micro = self.noise.fbm(
            x * cfg.noise_high_scale * 2.0,
            y * cfg.noise_high_scale * 2.0,
            channel::MICRO,
            2,
        ) * cfg.micro_ampl;

        if preserve > 0.0 {
            let calm = lerp(cfg.center_jitter_reduction, 1.0, 1.0 - smoothstep(preserve));
            jitter *= calm;
            micro *= calm;
        }

        depth += jitter * (1.0 - edge_weight) + micro * 0.5;

        let interior = -depth.clamp(0.0, cfg.scaled_max_depth(depth_scale)) * cfg.vertical_scale;

        // Meet the outside ground exactly at the rim
        let feather = smoothstep((rim - r) / edge_blur);
        lerp(outside, interior, feather)
    }
}
