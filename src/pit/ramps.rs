//! Branch and secondary ramps cut into the pit walls.
//!
//! A ramp is a wedge anchored at a fixed angle that runs inward from the rim
//! for a fraction of the radius. Where wedges overlap the strongest one wins;
//! ramps never stack.

use std::f64::consts::PI;

use rand::Rng;

use crate::math::{angle_diff, lerp, safe_ratio, smoothstep};
use crate::noise_field::{channel, NoiseField};

/// Below this mask value a ramp leaves the depth untouched.
const MASK_CUTOFF: f64 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ramp {
    pub angle: f64,
    /// Fraction of the rim radius, measured inward, the ramp reaches
    pub reach: f64,
}

/// Fixed list of ramps sharing one angular spread and flatten factor.
#[derive(Clone, Debug)]
pub struct RampSet {
    ramps: Vec<Ramp>,
    spread: f64,
    flatten: f64,
}

impl RampSet {
    /// Ramps at seeded uniform angles, all reaching `reach`.
    pub fn generate<R: Rng>(count: usize, spread: f64, reach: f64, flatten: f64, rng: &mut R) -> Self {
        let ramps = (0..count)
            .map(|_| Ramp { angle: rng.gen_range(-PI..PI), reach })
            .collect();
        Self { ramps, spread, flatten }
    }

    /// Like [`generate`](Self::generate), with each ramp's reach jittered by
    /// low-frequency noise sampled at its angle.
    pub fn generate_jittered<R: Rng>(
        count: usize,
        spread: f64,
        reach: f64,
        flatten: f64,
        noise: &NoiseField,
        rng: &mut R,
    ) -> Self {
        let mut set = Self::generate(count, spread, reach, flatten, rng);
        for ramp in &mut set.ramps {
            let jitter = noise.fbm(ramp.angle.cos() * 0.2, ramp.angle.sin() * 0.2, channel::RAMP_REACH, 2);
            ramp.reach = (reach + jitter * 0.12).max(0.0);
        }
        set
    }

    pub fn ramps(&self) -> &[Ramp] {
        &self.ramps
    }

    /// Strongest ramp influence at `(r, θ)` inside a rim of radius `rim`, in [0, 1].
    pub fn mask(&self, r: f64, theta: f64, rim: f64) -> f64 {
        if r > rim || self.spread <= 0.0 {
            return 0.0;
        }
        let frac = 1.0 - safe_ratio(r, rim);

        let mut mask: f64 = 0.0;
        for ramp in &self.ramps {
            let d = angle_diff(theta, ramp.angle).abs();
            if d >= self.spread || frac >= ramp.reach {
                continue;
            }
            let angular = smoothstep(1.0 - d / self.spread);
            let radial = smoothstep(1.0 - safe_ratio(frac, ramp.reach));
            mask = mask.max(angular * radial);
        }
        mask.clamp(0.0, 1.0)
    }

    /// Pull `depth` toward the flatten factor where a ramp passes.
    pub fn apply(&self, depth: f64, r: f64, theta: f64, rim: f64, size_scale: f64) -> f64 {
        let mask = self.mask(r, theta, rim);
        if mask <= MASK_CUTOFF {
            return depth;
        }
        let frac = 1.0 - safe_ratio(r, rim);
        let strength = smoothstep(frac) * mask;
        depth * lerp(1.0, self.flatten, strength * (0.8 + 0.2 * size_scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(angle: f64) -> RampSet {
        RampSet {
            ramps: vec![Ramp { angle, reach: 0.5 }],
            spread: 0.5,
            flatten: 0.4,
        }
    }

    #[test]
    fn test_mask_zero_outside_wedge_and_rim() {
        let set = single(0.0);
        assert_eq!(set.mask(50.0, PI, 100.0), 0.0);
        assert_eq!(set.mask(120.0, 0.0, 100.0), 0.0);
        // Deeper than the ramp reaches
        assert_eq!(set.mask(10.0, 0.0, 100.0), 0.0);
    }

    #[test]
    fn test_mask_peaks_on_ramp_axis() {
        let set = single(0.3);
        let on_axis = set.mask(80.0, 0.3, 100.0);
        let off_axis = set.mask(80.0, 0.55, 100.0);
        assert!(on_axis > off_axis);
        assert!(on_axis > 0.0 && on_axis <= 1.0);
    }

    #[test]
    fn test_overlapping_ramps_take_maximum() {
        let mut set = single(0.0);
        let alone = set.mask(80.0, 0.1, 100.0);
        set.ramps.push(Ramp { angle: 0.05, reach: 0.5 });
        let both = set.mask(80.0, 0.1, 100.0);
        let second = RampSet { ramps: vec![Ramp { angle: 0.05, reach: 0.5 }], spread: 0.5, flatten: 0.4 }
            .mask(80.0, 0.1, 100.0);
        assert!((both - alone.max(second)).abs() < 1e-12);
    }

    #[test]
    fn test_apply_only_reduces_depth() {
        let set = single(0.0);
        let depth = 30.0;
        let flattened = set.apply(depth, 80.0, 0.0, 100.0, 1.0);
        assert!(flattened < depth);
        assert!(flattened >= depth * 0.4);
        assert_eq!(set.apply(depth, 80.0, PI, 100.0, 1.0), depth);
    }

    #[test]
    fn test_generation_is_seeded() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        let a = RampSet::generate(4, 0.4, 0.55, 0.5, &mut ChaCha8Rng::seed_from_u64(3));
        let b = RampSet::generate(4, 0.4, 0.55, 0.5, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a.ramps(), b.ramps());
        assert_eq!(a.ramps().len(), 4);
    }
}
