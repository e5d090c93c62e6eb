// Host-side tests for the scalar easing helpers.

use shatter_core::*;

#[test]
fn ease_in_out_cubic_hits_anchor_points() {
    assert_eq!(ease_in_out_cubic(0.0), 0.0);
    assert_eq!(ease_in_out_cubic(0.5), 0.5);
    assert_eq!(ease_in_out_cubic(1.0), 1.0);
}

#[test]
fn ease_in_out_cubic_is_monotonic_on_unit_interval() {
    let mut prev = ease_in_out_cubic(0.0);
    for i in 1..=1000 {
        let x = i as f32 / 1000.0;
        let y = ease_in_out_cubic(x);
        assert!(y >= prev, "ease decreased at x={x}: {prev} -> {y}");
        prev = y;
    }
}

#[test]
fn ease_in_out_cubic_matches_polynomial_on_both_halves() {
    let x = 0.25_f32;
    assert!((ease_in_out_cubic(x) - 4.0 * x * x * x).abs() < 1e-7);
    let x = 0.75_f32;
    let expected = 1.0 - (-2.0 * x + 2.0).powi(3) / 2.0;
    assert!((ease_in_out_cubic(x) - expected).abs() < 1e-7);
    // Symmetric around the midpoint
    assert!((ease_in_out_cubic(0.25) + ease_in_out_cubic(0.75) - 1.0).abs() < 1e-6);
}

#[test]
fn lerp_returns_endpoints() {
    let pairs = [
        (0.0_f32, 8.0_f32),
        (40.0, 80.0),
        (0.1, 0.6),
        (-3.5, 12.25),
        (1.1, 1.7),
        (0.9, 0.05),
    ];
    for (a, b) in pairs {
        assert_eq!(lerp(a, b, 0.0), a);
        let end = lerp(a, b, 1.0);
        assert!(
            (end - b).abs() <= 2.0 * f32::EPSILON * b.abs().max(a.abs()),
            "lerp({a}, {b}, 1) = {end}"
        );
    }
}

#[test]
fn clamp01_bounds_values() {
    assert_eq!(clamp01(-0.5), 0.0);
    assert_eq!(clamp01(0.5), 0.5);
    assert_eq!(clamp01(1.5), 1.0);
}
