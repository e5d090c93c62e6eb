// Host-side tests for the fragment population generator.

use rand::{rngs::StdRng, SeedableRng};
use shatter_core::*;
use std::f32::consts::PI;

#[test]
fn count_never_exceeds_capacity_and_ignores_seed() {
    let params = SimParams::default();
    for capacity in [1, 7, 8, 27, 64, 110, 125, 220, 500] {
        let a = generate(capacity, &params, &mut StdRng::seed_from_u64(1));
        let b = generate(capacity, &params, &mut StdRng::seed_from_u64(99));
        assert!(a.len() <= capacity, "capacity {capacity} produced {}", a.len());
        assert_eq!(a.len(), b.len(), "count changed with seed for {capacity}");
        assert_eq!(a.len(), lattice_points(capacity, &params).len());
    }
}

#[test]
fn reference_tiers_fill_as_expected() {
    let params = SimParams::default();
    // 6^3 = 216 cells all fit inside the acceptance sphere
    assert_eq!(lattice_points(DESKTOP_CAPACITY, &params).len(), 216);
    // 5^3 = 125 cells, capped at capacity
    assert_eq!(lattice_points(MOBILE_CAPACITY, &params).len(), MOBILE_CAPACITY);
    assert_eq!(lattice_points(8, &params).len(), 8);
}

#[test]
fn zero_capacity_yields_empty_population() {
    let params = SimParams::default();
    let mut rng = StdRng::seed_from_u64(3);
    assert!(generate(0, &params, &mut rng).is_empty());
}

#[test]
fn large_capacity_under_fills_inside_acceptance_radius() {
    let params = SimParams::default();
    let points = lattice_points(10_000, &params);
    assert!(!points.is_empty());
    assert!(points.len() < 10_000);
    for p in points {
        assert!(p.length() <= params.acceptance_radius);
    }
}

#[test]
fn fragments_start_at_rest_with_valid_random_state() {
    let params = SimParams::default();
    let fragments = generate(DESKTOP_CAPACITY, &params, &mut StdRng::seed_from_u64(7));
    for f in &fragments {
        assert_eq!(f.position, f.base_position());
        assert_eq!(f.velocity, glam::Vec3::ZERO);
        assert!((f.direction().length() - 1.0).abs() < 1e-5);
        for angle in f.rotation.to_array() {
            assert!((0.0..PI).contains(&angle), "rotation {angle} out of range");
        }
        for w in f.angular_velocity().to_array() {
            assert!((-1.0..1.0).contains(&w), "spin {w} out of range");
        }
    }
}

#[test]
fn directions_point_outward() {
    let params = SimParams::default();
    let fragments = generate(DESKTOP_CAPACITY, &params, &mut StdRng::seed_from_u64(11));
    let outward = fragments
        .iter()
        .filter(|f| f.direction().dot(f.base_position()) > 0.0)
        .count();
    assert!(outward * 10 >= fragments.len() * 9, "only {outward} outward");
}

#[test]
fn same_seed_reproduces_population() {
    let params = SimParams::default();
    let a = generate(64, &params, &mut StdRng::seed_from_u64(5));
    let b = generate(64, &params, &mut StdRng::seed_from_u64(5));
    assert_eq!(a, b);
}

// Reference enumeration over the full cube, without the slab window.
fn full_cube_points(capacity: usize, params: &SimParams) -> Vec<glam::Vec3> {
    let grid = lattice_dimension(capacity);
    let s = params.lattice_spacing;
    let offset = grid.saturating_sub(1) as f32 * s / 2.0;
    let mut out = Vec::new();
    for x in 0..grid {
        for y in 0..grid {
            for z in 0..grid {
                if out.len() >= capacity {
                    return out;
                }
                let p = glam::Vec3::new(
                    x as f32 * s - offset,
                    y as f32 * s - offset + params.lattice_y_bias,
                    z as f32 * s - offset,
                );
                if p.length() <= params.acceptance_radius {
                    out.push(p);
                }
            }
        }
    }
    out
}

#[test]
fn lattice_matches_full_cube_enumeration() {
    let params = SimParams::default();
    for capacity in [1, 8, 110, 220, 1_000, 10_000, 60_000] {
        assert_eq!(
            lattice_points(capacity, &params),
            full_cube_points(capacity, &params),
            "capacity {capacity}"
        );
    }
}

#[test]
fn extreme_capacity_stays_bounded() {
    let params = SimParams::default();
    let points = lattice_points(usize::MAX, &params);
    assert!(!points.is_empty());
    // A sphere of radius 1.8 holds a few hundred cells at 0.35 spacing
    assert!(points.len() < 2_000, "{} points", points.len());
    for p in points {
        assert!(p.length() <= params.acceptance_radius);
    }
}
