//! Pit center placement.

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MineConfig;

/// Position and independent horizontal/vertical scale of one excavation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PitCenter {
    pub x: f64,
    pub y: f64,
    pub size_scale: f64,
    pub depth_scale: f64,
}

impl PitCenter {
    /// The mandatory main pit at the origin.
    pub const PRIMARY: PitCenter = PitCenter {
        x: 0.0,
        y: 0.0,
        size_scale: 1.0,
        depth_scale: 1.0,
    };

    pub fn new(x: f64, y: f64, size_scale: f64, depth_scale: f64) -> Self {
        Self { x, y, size_scale, depth_scale }
    }
}

/// Explicit centers when configured, otherwise the primary pit plus
/// `multi_pit_count` satellites scattered around it.
///
/// Each satellite draws, in order: angle, distance, size scale, depth scale.
/// Explicit centers consume nothing from `rng`.
pub fn generate_pit_centers<R: Rng>(config: &MineConfig, rng: &mut R) -> Vec<PitCenter> {
    if let Some(explicit) = &config.explicit_pit_centers {
        return explicit.clone();
    }

    let mut centers = Vec::with_capacity(config.multi_pit_count + 1);
    centers.push(PitCenter::PRIMARY);

    for _ in 0..config.multi_pit_count {
        let angle = rng.gen_range(-PI..PI);
        let distance = rng.gen_range(config.pit_spread * 0.45..=config.pit_spread * 1.25);
        let size_scale = rng.gen_range(config.pit_size_variation..=1.0);
        let depth_scale = rng.gen_range(config.pit_depth_variation..=1.0);
        centers.push(PitCenter::new(
            angle.cos() * distance,
            angle.sin() * distance,
            size_scale,
            depth_scale,
        ));
    }

    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_primary_center_first() {
        let config = MineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let centers = generate_pit_centers(&config, &mut rng);

        assert_eq!(centers.len(), config.multi_pit_count + 1);
        assert_eq!(centers[0], PitCenter::PRIMARY);
    }

    #[test]
    fn test_satellites_within_spread_and_scale_ranges() {
        let config = MineConfig { multi_pit_count: 12, ..Default::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let centers = generate_pit_centers(&config, &mut rng);

        for c in &centers[1..] {
            let d = c.x.hypot(c.y);
            assert!(d >= config.pit_spread * 0.45 - 1e-9);
            assert!(d <= config.pit_spread * 1.25 + 1e-9);
            assert!(c.size_scale >= config.pit_size_variation && c.size_scale <= 1.0);
            assert!(c.depth_scale >= config.pit_depth_variation && c.depth_scale <= 1.0);
        }
    }

    #[test]
    fn test_collapsed_ranges_yield_their_bound() {
        let config = MineConfig {
            multi_pit_count: 3,
            pit_spread: 0.0,
            pit_size_variation: 1.0,
            pit_depth_variation: 1.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for c in &generate_pit_centers(&config, &mut rng)[1..] {
            assert_eq!(c.x.hypot(c.y), 0.0);
            assert_eq!(c.size_scale, 1.0);
            assert_eq!(c.depth_scale, 1.0);
        }
    }

    #[test]
    fn test_explicit_centers_bypass_rng() {
        let explicit = vec![PitCenter::PRIMARY, PitCenter::new(40.0, 10.0, 0.7, 0.8)];
        let config = MineConfig { explicit_pit_centers: Some(explicit.clone()), ..Default::default() };

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut untouched = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(generate_pit_centers(&config, &mut rng), explicit);
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }
}
