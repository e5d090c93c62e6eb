//! Scalar easing and interpolation helpers.

use glam::Vec3;

/// Linear interpolation between `a` and `b`. `t` outside \[0, 1\] extrapolates.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp a value into \[0, 1\].
#[inline]
pub fn clamp01(v: f32) -> f32 {
    1.0_f32.min(0.0_f32.max(v))
}

/// Classic ease-in-out cubic curve.
#[inline]
pub fn ease_in_out_cubic(x: f32) -> f32 {
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Blend factor for frame-rate independent exponential smoothing.
#[inline]
pub fn exp_smoothing(rate: f32, delta: f32) -> f32 {
    1.0 - (-delta * rate).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp01_passes_interior_values() {
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(-3.0), 0.0);
        assert_eq!(clamp01(7.0), 1.0);
    }

    #[test]
    fn lerp_extrapolates_past_one() {
        assert_eq!(lerp(0.0, 10.0, 1.5), 15.0);
        assert_eq!(lerp(2.0, 4.0, -1.0), 0.0);
    }

    #[test]
    fn exp_smoothing_is_zero_without_time() {
        assert_eq!(exp_smoothing(3.0, 0.0), 0.0);
        assert!(exp_smoothing(3.0, 10.0) > 0.999);
    }
}
