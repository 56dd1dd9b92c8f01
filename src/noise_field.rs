//! Seeded gradient noise and its fractal sum.
//!
//! Every organic variation in the mine (rim wobble, bench widths, jitter,
//! dump surfaces) samples one shared Perlin source. Independent layers are
//! separated by the `channel` coordinate rather than by separate generators,
//! so the whole terrain depends on a single noise seed.

use noise::{NoiseFn, Perlin};

/// Noise channels used by the field generators.
///
/// A channel is the third Perlin coordinate. Per-bench channels add a
/// multiple of the bench index on top of their base.
pub mod channel {
    pub const RIM_BROAD: f64 = 0.0;
    pub const RIM_DEFORM: f64 = 3.0;
    pub const BENCH_WIDTH: f64 = 5.0;
    pub const BENCH_RIM: f64 = 7.0;
    pub const BENCH_SKIP: f64 = 11.0;
    pub const DUMP_LANDSLIDE: f64 = 13.0;
    pub const DUMP_SURFACE: f64 = 19.0;
    pub const AMBIENT: f64 = 21.0;
    pub const JITTER: f64 = 29.0;
    pub const RAMP_REACH: f64 = 41.0;
    pub const MICRO: f64 = 97.0;
    pub const PLATEAU: f64 = 101.0;
}

/// Continuous, seed-parameterized scalar field.
#[derive(Clone)]
pub struct NoiseField {
    seed: u32,
    perlin: Perlin,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            perlin: Perlin::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Single gradient-noise lookup, roughly in [-1, 1].
    pub fn noise3(&self, x: f64, y: f64, channel: f64) -> f64 {
        self.perlin.get([x, y, channel]).clamp(-1.0, 1.0)
    }

    /// Fractal sum `Σ gainⁱ · noise3(x·lacunarityⁱ, y·lacunarityⁱ, channel)`.
    ///
    /// Not normalized: the amplitude grows with the octave count, which the
    /// callers' amplitude constants account for. Zero octaves yield 0.
    pub fn fbm_with(
        &self,
        x: f64,
        y: f64,
        channel: f64,
        octaves: u32,
        lacunarity: f64,
        gain: f64,
    ) -> f64 {
        let mut value = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;

        for _ in 0..octaves {
            value += amplitude * self.noise3(x * frequency, y * frequency, channel);
            frequency *= lacunarity;
            amplitude *= gain;
        }

        value
    }

    /// [`fbm_with`](Self::fbm_with) at lacunarity 2 and gain 0.5.
    pub fn fbm(&self, x: f64, y: f64, channel: f64, octaves: u32) -> f64 {
        self.fbm_with(x, y, channel, octaves, 2.0, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_deterministic() {
        let a = NoiseField::new(1234);
        let b = NoiseField::new(1234);
        for i in 0..50 {
            let x = i as f64 * 0.37 - 4.0;
            let y = i as f64 * 0.11 + 2.5;
            assert_eq!(a.noise3(x, y, 3.0), b.noise3(x, y, 3.0));
            assert_eq!(a.fbm(x, y, 21.0, 4), b.fbm(x, y, 21.0, 4));
        }
    }

    #[test]
    fn test_noise3_range() {
        let field = NoiseField::new(7);
        for i in 0..400 {
            let v = field.noise3(i as f64 * 0.173, i as f64 * 0.291, 5.0);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_zero_octaves_contribute_nothing() {
        let field = NoiseField::new(99);
        assert_eq!(field.fbm(0.3, 0.7, 1.0, 0), 0.0);
    }

    #[test]
    fn test_fbm_bounded_by_geometric_amplitude() {
        let field = NoiseField::new(42);
        // 1 + 0.5 + 0.25 + 0.125
        let bound = 1.875;
        for i in 0..200 {
            let v = field.fbm(i as f64 * 0.41, i as f64 * -0.23, 11.0, 4);
            assert!(v.abs() <= bound + 1e-9);
        }
    }

    #[test]
    fn test_channels_are_independent() {
        let field = NoiseField::new(42);
        let differs = (0..20).any(|i| {
            let x = 0.3 + i as f64 * 0.19;
            let y = 0.7 - i as f64 * 0.13;
            (field.noise3(x, y, channel::RIM_DEFORM) - field.noise3(x, y, channel::AMBIENT)).abs() > 1e-6
        });
        assert!(differs);
    }

    #[test]
    fn test_seed_changes_field() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..20).any(|i| {
            let x = 0.31 + i as f64 * 0.27;
            (a.noise3(x, 0.5, 0.0) - b.noise3(x, 0.5, 0.0)).abs() > 1e-6
        });
        assert!(differs);
    }
}
