//! Rim, bench and haul-road geometry of a single pit.
//!
//! Everything here is a function of the polar angle around a pit center; the
//! rim wobble is sampled on a circle in noise space so it closes seamlessly
//! at ±π.

use std::f64::consts::TAU;

use crate::math::{angle_diff, lerp, safe_ratio, smoothstep, EPSILON};
use crate::noise_field::channel;

use super::PitField;

/// The effective rim never shrinks below this radius.
pub const MIN_RIM_RADIUS: f64 = 2.0;

impl PitField {
    /// Broad low-frequency wobble of the rim, roughly ±0.5.
    fn broad_variation(&self, theta: f64) -> f64 {
        self.noise.fbm(theta.cos() * 0.32, theta.sin() * 0.32, channel::RIM_BROAD, 3) * 0.48
    }

    /// Higher-frequency rim deformation noise.
    fn rim_noise(&self, theta: f64) -> f64 {
        let scale = self.config.boundary_noise_scale;
        self.noise.fbm(
            theta.cos() * scale,
            theta.sin() * scale,
            channel::RIM_DEFORM,
            self.config.boundary_fbm_octaves,
        )
    }

    /// `base_radius` perturbed by the same broad and rim noise the pit rim uses.
    ///
    /// Used by landforms that share the pit's outline character.
    pub fn deformed_radius(&self, theta: f64, base_radius: f64) -> f64 {
        let broad = self.broad_variation(theta) * base_radius * 0.11;
        let rim = self.rim_noise(theta) * base_radius * self.config.boundary_noise_strength;
        (base_radius + broad + rim).max(EPSILON)
    }

    /// Angle-dependent boundary radius of a pit with the given size scale.
    ///
    /// Near the road exit (the working face) the rim is eased back toward its
    /// broad, undeformed outline so the road never crosses a jagged edge.
    pub fn effective_radius(&self, theta: f64, size_scale: f64) -> f64 {
        let cfg = &self.config;
        let base = cfg.max_pit_radius * size_scale;
        let broad = base + self.broad_variation(theta) * cfg.max_pit_radius * 0.11 * size_scale;
        let mut radius = broad + self.rim_noise(theta) * cfg.max_pit_radius * cfg.boundary_noise_strength * size_scale;

        // The spiral meets the rim at the working face angle
        let threshold = cfg.road_boundary_threshold_deg.to_radians();
        let d = angle_diff(theta, self.working_face_angle).abs();
        if threshold > 0.0 && d < threshold {
            let blend = smoothstep(1.0 - d / threshold);
            radius = lerp(radius, broad, cfg.road_boundary_smooth * blend);
        }

        radius.max(MIN_RIM_RADIUS)
    }

    /// Rim radius of the primary pit, the reference for dumps and rim blending.
    pub fn primary_rim_radius(&self, theta: f64) -> f64 {
        self.effective_radius(theta, self.primary_center().size_scale)
    }

    pub fn total_bench_count(&self, depth_scale: f64) -> usize {
        let count = safe_ratio(self.config.scaled_max_depth(depth_scale), self.config.bench_height).floor();
        (count as usize).max(1)
    }

    /// Terrace index at radius `r`: 0 at the rim, growing toward the centre.
    pub fn bench_index(&self, r: f64, rim: f64, depth_scale: f64) -> usize {
        let norm = (1.0 - safe_ratio(r, rim)).clamp(0.0, 1.0);
        (norm * self.total_bench_count(depth_scale) as f64).floor() as usize
    }

    /// Horizontal radius of bench `index`, perturbed independently per bench.
    pub fn bench_rim_radius(&self, index: usize, theta: f64, size_scale: f64, depth_scale: f64) -> f64 {
        let cfg = &self.config;
        let idx = index as f64;
        let t = idx / self.total_bench_count(depth_scale) as f64;
        let base_radius = (1.0 - t) * cfg.max_pit_radius * size_scale;

        let perturb = self.noise.fbm(
            theta.cos() * 0.22 + idx * 0.13,
            theta.sin() * 0.22 + idx * 0.19,
            channel::BENCH_WIDTH + idx * 9.0,
            2,
        );
        let width_jitter = (perturb * 0.5 + 0.5) * (cfg.mean_bench_width - cfg.min_bench_width);
        let r_base = base_radius + width_jitter + idx * 0.01;

        let bench_channel = channel::BENCH_RIM + (idx * cfg.boundary_per_bench_variation * 1000.0).floor();
        let scale = cfg.boundary_noise_scale;
        let noise = self.noise.fbm(theta.cos() * scale, theta.sin() * scale, bench_channel, cfg.boundary_fbm_octaves);

        // Deeper benches wander further from the circle
        let deformation = cfg.boundary_noise_strength * noise * smoothstep(t);
        (r_base * (1.0 + deformation)).max(0.1)
    }

    /// Angle of the haul-road spiral at radius `r` inside a rim of radius `rim`.
    pub fn spiral_angle(&self, r: f64, rim: f64) -> f64 {
        let frac = (1.0 - safe_ratio(r, rim)).clamp(0.0, 1.0);
        self.working_face_angle + frac * self.config.road_spiral_turns * TAU
    }

    /// Closeness to the road centreline in [0, 1]; 0 off the road.
    pub fn road_strength(&self, r: f64, theta: f64, rim: f64) -> f64 {
        if r > rim {
            return 0.0;
        }
        let deviation = angle_diff(theta, self.spiral_angle(r, rim)).abs();
        let arc = deviation * r.max(EPSILON);
        let half_width = self.config.road_width * 0.5;
        if arc > half_width {
            return 0.0;
        }
        smoothstep(1.0 - safe_ratio(arc, half_width))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::MineConfig;
    use crate::pit::{PitCenter, PitField};
    use crate::terrain::MineTerrain;

    fn pit_field(config: &MineConfig) -> PitField {
        MineTerrain::new(config.clone()).unwrap().pit().clone()
    }

    fn single_pit_config() -> MineConfig {
        MineConfig {
            seed: Some(42),
            explicit_pit_centers: Some(vec![PitCenter::PRIMARY]),
            ..Default::default()
        }
    }

    #[test]
    fn test_effective_radius_near_base_radius() {
        let pit = pit_field(&single_pit_config());
        for i in 0..72 {
            let theta = -std::f64::consts::PI + i as f64 * 0.0872;
            let r = pit.effective_radius(theta, 1.0);
            // Broad ±0.48·1.75·0.11 and rim ±1.75·0.10 of the radius
            assert!(r > 110.0 * 0.6 && r < 110.0 * 1.4, "rim radius {} at {}", r, theta);
        }
    }

    #[test]
    fn test_effective_radius_scales_with_size() {
        let pit = pit_field(&single_pit_config());
        let full = pit.effective_radius(0.7, 1.0);
        let half = pit.effective_radius(0.7, 0.5);
        assert!((half - full * 0.5).abs() < 1e-6 || half == super::MIN_RIM_RADIUS);
    }

    #[test]
    fn test_bench_index_non_increasing_outward() {
        let pit = pit_field(&single_pit_config());
        let rim = 104.0;
        let mut previous = usize::MAX;
        for step in 0..=520 {
            let r = step as f64 * 0.2;
            let idx = pit.bench_index(r, rim, 1.0);
            assert!(idx <= previous, "bench index rose from {} to {} at r={}", previous, idx, r);
            previous = idx;
        }
        assert_eq!(pit.bench_index(rim, rim, 1.0), 0);
        assert_eq!(pit.bench_index(0.0, rim, 1.0), pit.total_bench_count(1.0));
    }

    #[test]
    fn test_total_bench_count() {
        let pit = pit_field(&single_pit_config());
        assert_eq!(pit.total_bench_count(1.0), 10);
        assert_eq!(pit.total_bench_count(0.55), 5);
        assert_eq!(pit.total_bench_count(0.0), 1);
    }

    #[test]
    fn test_spiral_starts_at_working_face() {
        let pit = pit_field(&single_pit_config());
        let rim = 100.0;
        assert!((pit.spiral_angle(rim, rim) - pit.working_face_angle()).abs() < 1e-12);
        let turns = pit.spiral_angle(0.0, rim) - pit.working_face_angle();
        assert!((turns - 4.5 * std::f64::consts::TAU).abs() < 1e-9);
    }

    #[test]
    fn test_road_strength_on_and_off_centreline() {
        let pit = pit_field(&single_pit_config());
        let rim = 100.0;
        let r = 60.0;
        let on = pit.spiral_angle(r, rim);
        assert!((pit.road_strength(r, on, rim) - 1.0).abs() < 1e-9);
        assert_eq!(pit.road_strength(r, on + std::f64::consts::PI, rim), 0.0);
        assert_eq!(pit.road_strength(rim + 1.0, on, rim), 0.0);
    }
}
