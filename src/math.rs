//! Scalar helpers shared by every field generator.

use std::f64::consts::{PI, TAU};

/// Floor substituted for radii, widths and slopes before they are used as divisors.
pub const EPSILON: f64 = 1e-6;

/// Cubic Hermite ease `3t² − 2t³` on `t` clamped to [0, 1].
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Shortest signed difference `a − b`, wrapped into (−π, π].
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b + PI).rem_euclid(TAU) - PI;
    if d <= -PI {
        d + TAU
    } else {
        d
    }
}

/// `value / divisor` with the divisor floored at [`EPSILON`].
pub fn safe_ratio(value: f64, divisor: f64) -> f64 {
    value / divisor.max(EPSILON)
}

/// Polar coordinates `(r, θ)` of `(x, y)` relative to `(cx, cy)`.
pub fn polar(x: f64, y: f64, cx: f64, cy: f64) -> (f64, f64) {
    let lx = x - cx;
    let ly = y - cy;
    (lx.hypot(ly), ly.atan2(lx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_endpoints_and_clamp() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(-3.0), 0.0);
        assert_eq!(smoothstep(7.5), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_angle_diff_wraps_to_half_open_range() {
        assert!((angle_diff(0.1, -0.1) - 0.2).abs() < 1e-12);
        // Crossing the ±π seam takes the short way round
        let d = angle_diff(PI - 0.05, -PI + 0.05);
        assert!((d + 0.1).abs() < 1e-9);
        // Exactly opposite lands on +π, never −π
        assert!((angle_diff(PI, 0.0) - PI).abs() < 1e-12);
        assert!((angle_diff(0.0, PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_safe_ratio_floors_divisor() {
        assert_eq!(safe_ratio(2.0, 4.0), 0.5);
        assert!(safe_ratio(1.0, 0.0).is_finite());
        assert!(safe_ratio(1.0, -5.0).is_finite());
    }
}
