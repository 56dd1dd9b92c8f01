//! Relaxation parameters and presets

use crate::config::MineConfig;

/// Erosion intensity preset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ErosionPreset {
    /// No relaxation - raw composited terrain
    None,
    /// Minimal relaxation - takes the edge off noise
    Minimal,
    /// Use the configured iteration count and rate
    #[default]
    Configured,
    /// Heavy relaxation - weathered, long-abandoned look
    Weathered,
}

impl ErosionPreset {
    pub fn all() -> &'static [Self] {
        &[Self::None, Self::Minimal, Self::Configured, Self::Weathered]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::None => "No relaxation (raw terrain)",
            Self::Minimal => "Subtle smoothing",
            Self::Configured => "Configured iterations",
            Self::Weathered => "Weathered benches",
        }
    }

    /// Parameters for this preset, starting from the configured ones.
    pub fn params(&self, base: &RelaxParams) -> RelaxParams {
        match self {
            Self::None => RelaxParams { iterations: 0, ..base.clone() },
            Self::Minimal => RelaxParams { iterations: 2, rate: base.rate * 0.5, ..base.clone() },
            Self::Configured => base.clone(),
            Self::Weathered => RelaxParams {
                iterations: base.iterations * 4,
                rate: (base.rate * 1.5).min(1.0),
                ..base.clone()
            },
        }
    }
}

impl std::fmt::Display for ErosionPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Minimal => write!(f, "minimal"),
            Self::Configured => write!(f, "configured"),
            Self::Weathered => write!(f, "weathered"),
        }
    }
}

/// Neighbour-average relaxation settings
#[derive(Clone, Debug, PartialEq)]
pub struct RelaxParams {
    /// Number of full-grid passes
    pub iterations: usize,

    /// Fraction of the gap to the 8-neighbour average closed per pass (0.0-1.0)
    pub rate: f64,

    /// How strongly local steepness damps the rate.
    /// Falloff is `1 / (1 + damping · |avg − centre|)`, so bench risers and
    /// road cuts erode less than broad noisy ground.
    pub steepness_damping: f64,
}

impl Default for RelaxParams {
    fn default() -> Self {
        Self::from_config(&MineConfig::default())
    }
}

impl RelaxParams {
    pub fn new(iterations: usize, rate: f64) -> Self {
        Self {
            iterations,
            rate,
            ..Default::default()
        }
    }

    pub fn from_config(config: &MineConfig) -> Self {
        Self {
            iterations: config.erosion_iterations,
            rate: config.erosion_rate,
            steepness_damping: config.erosion_steepness_damping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_config() {
        let params = RelaxParams::default();
        assert_eq!(params.iterations, 6);
        assert_eq!(params.rate, 0.42);
        assert_eq!(params.steepness_damping, 6.0);
    }

    #[test]
    fn test_presets() {
        let base = RelaxParams::default();
        assert_eq!(ErosionPreset::None.params(&base).iterations, 0);
        assert_eq!(ErosionPreset::Configured.params(&base), base);
        let weathered = ErosionPreset::Weathered.params(&base);
        assert!(weathered.iterations > base.iterations);
        assert!(weathered.rate <= 1.0);
        assert_eq!(ErosionPreset::all().len(), 4);
    }
}
