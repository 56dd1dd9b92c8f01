//! Secondary terraced landform: a flat-topped mound with stepped sides.
//!
//! The outline reuses the pit rim deformation so the mound reads as part of
//! the same mine. Disabled unless a [`PlateauConfig`] is supplied.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::math::{polar, safe_ratio, smoothstep};
use crate::noise_field::{channel, NoiseField};
use crate::pit::PitField;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlateauConfig {
    pub center_x: f64,
    pub center_y: f64,
    /// Radius of the base
    pub radius: f64,
    /// Radius of the flat top, smaller than `radius`
    pub flat_top_radius: f64,
    pub max_height: f64,
    pub bench_height: f64,
    pub noise_amplitude: f64,
}

impl Default for PlateauConfig {
    fn default() -> Self {
        Self {
            center_x: 150.0,
            center_y: 120.0,
            radius: 45.0,
            flat_top_radius: 18.0,
            max_height: 24.0,
            bench_height: 4.0,
            noise_amplitude: 0.6,
        }
    }
}

impl PlateauConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius > 0.0) {
            return Err(ConfigError::InvalidPlateau(format!("radius must be positive, got {}", self.radius)));
        }
        if !(self.flat_top_radius >= 0.0 && self.flat_top_radius < self.radius) {
            return Err(ConfigError::InvalidPlateau(format!(
                "flat top radius {} must lie in [0, {})",
                self.flat_top_radius, self.radius
            )));
        }
        if !(self.bench_height > 0.0) || !(self.max_height > 0.0) {
            return Err(ConfigError::InvalidPlateau("bench and max height must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PlateauField {
    config: PlateauConfig,
    noise: NoiseField,
    vertical_scale: f64,
}

impl PlateauField {
    pub fn new(config: PlateauConfig, noise: NoiseField, vertical_scale: f64) -> Self {
        Self { config, noise, vertical_scale }
    }

    pub fn config(&self) -> &PlateauConfig {
        &self.config
    }

    /// Mound height at `(x, y)`, or `None` outside its base.
    pub fn height_at(&self, pit: &PitField, x: f64, y: f64) -> Option<f64> {
        let cfg = &self.config;
        let (r, theta) = polar(x, y, cfg.center_x, cfg.center_y);

        let outer = pit.deformed_radius(theta, cfg.radius);
        if r > outer {
            return None;
        }
        // Top keeps the same proportion of the deformed base
        let top = outer * safe_ratio(cfg.flat_top_radius, cfg.radius);

        let mut height = if r <= top {
            cfg.max_height
        } else {
            let t = 1.0 - safe_ratio(r - top, outer - top);
            let benches = (cfg.max_height / cfg.bench_height).floor();
            (t * benches).floor() * cfg.bench_height
        };

        // Surface noise fades out over one bench height from the base outline
        let edge = smoothstep(safe_ratio(outer - r, cfg.bench_height));
        height += self.noise.fbm(x * 0.04, y * 0.04, channel::PLATEAU, 4) * cfg.noise_amplitude * edge;
        Some(height.max(0.0) * self.vertical_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MineConfig;
    use crate::terrain::MineTerrain;

    fn terrain_with_plateau(plateau: PlateauConfig) -> MineTerrain {
        MineTerrain::new(MineConfig {
            seed: Some(9),
            plateau: Some(plateau),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_validation() {
        assert!(PlateauConfig::default().validate().is_ok());
        let bad = PlateauConfig { flat_top_radius: 50.0, ..Default::default() };
        assert!(bad.validate().is_err());
        let bad = PlateauConfig { bench_height: 0.0, ..Default::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_flat_top_and_outside() {
        let plateau = PlateauConfig { noise_amplitude: 0.0, ..Default::default() };
        let vertical_scale = MineConfig::default().vertical_scale;
        let terrain = terrain_with_plateau(plateau.clone());
        let field = terrain.plateau().unwrap();

        let top = field.height_at(terrain.pit(), plateau.center_x, plateau.center_y);
        assert_eq!(top, Some(plateau.max_height * vertical_scale));

        let far = field.height_at(terrain.pit(), plateau.center_x + plateau.radius * 2.0, plateau.center_y);
        assert_eq!(far, None);
    }

    #[test]
    fn test_meets_ground_at_base_outline() {
        let plateau = PlateauConfig { noise_amplitude: 2.0, ..Default::default() };
        let terrain = terrain_with_plateau(plateau.clone());
        let field = terrain.plateau().unwrap();
        for i in 0..24 {
            let theta = -std::f64::consts::PI + i as f64 * 0.26;
            let outer = terrain.pit().deformed_radius(theta, plateau.radius);
            let r = outer - 1e-4;
            let h = field.height_at(
                terrain.pit(),
                plateau.center_x + r * theta.cos(),
                plateau.center_y + r * theta.sin(),
            );
            assert!(matches!(h, Some(v) if v < 1e-3), "height {:?} at the base outline", h);
        }
    }

    #[test]
    fn test_sides_are_terraced_and_descend() {
        let plateau = PlateauConfig { noise_amplitude: 0.0, ..Default::default() };
        let terrain = terrain_with_plateau(plateau.clone());
        let field = terrain.plateau().unwrap();
        let step = plateau.bench_height * MineConfig::default().vertical_scale;

        let mut previous = f64::INFINITY;
        for i in 0..60 {
            let x = plateau.center_x + i as f64 * 0.7;
            if let Some(h) = field.height_at(terrain.pit(), x, plateau.center_y) {
                assert!(h <= previous + 1e-9);
                // Every value is a whole number of benches or the top
                let benches = h / step;
                assert!((benches - benches.round()).abs() < 1e-9);
                previous = h;
            }
        }
    }
}
