//! Fragment population generator.
//!
//! Fragments are sampled from a cubic lattice centred on the origin and
//! filtered by a spherical acceptance volume, which reads as a rough
//! icosahedral solid when assembled. Which lattice points survive depends only
//! on `capacity` and the lattice parameters; the RNG only shapes each
//! fragment's explosion direction, initial orientation and spin.

use crate::fragment::Fragment;
use crate::params::SimParams;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;
use std::ops::Range;

/// Edge length (in cells) of the cubic lattice used for `capacity` fragments.
pub fn lattice_dimension(capacity: usize) -> usize {
    (capacity as f32).cbrt().round() as usize
}

/// Accepted base positions in lattice order, at most `capacity` of them.
pub fn lattice_points(capacity: usize, params: &SimParams) -> Vec<Vec3> {
    let grid = lattice_dimension(capacity);
    let spacing = params.lattice_spacing;
    let offset = grid.saturating_sub(1) as f32 * spacing / 2.0;
    let radius = params.acceptance_radius;

    // Cells whose single coordinate already exceeds the radius can never be
    // accepted, so only walk the slab around the sphere.
    let xs = axis_window(grid, spacing, offset, radius);
    let ys = axis_window(grid, spacing, offset - params.lattice_y_bias, radius);
    let zs = xs.clone();
    let cells = xs.len().saturating_mul(ys.len()).saturating_mul(zs.len());

    let mut points = Vec::with_capacity(capacity.min(cells));
    'lattice: for x in xs {
        for y in ys.clone() {
            for z in zs.clone() {
                if points.len() >= capacity {
                    break 'lattice;
                }
                let base = Vec3::new(
                    x as f32 * spacing - offset,
                    y as f32 * spacing - offset + params.lattice_y_bias,
                    z as f32 * spacing - offset,
                );
                if base.length() > radius {
                    continue;
                }
                points.push(base);
            }
        }
    }
    points
}

/// Lattice indices `i` in `0..grid` with `|i * spacing - offset| <= radius`,
/// widened by one cell on each side to absorb rounding.
fn axis_window(grid: usize, spacing: f32, offset: f32, radius: f32) -> Range<usize> {
    let lo = ((offset - radius) / spacing).floor() - 1.0;
    let hi = ((offset + radius) / spacing).ceil() + 2.0;
    let clamp = |v: f32| (v.max(0.0) as usize).min(grid);
    clamp(lo)..clamp(hi)
}

/// Build a fresh fragment set for `capacity`. May return fewer fragments than
/// requested when the acceptance volume rejects too many lattice cells.
pub fn generate<R: Rng + ?Sized>(
    capacity: usize,
    params: &SimParams,
    rng: &mut R,
) -> Vec<Fragment> {
    lattice_points(capacity, params)
        .into_iter()
        .map(|base| spawn_fragment(base, params, rng))
        .collect()
}

fn spawn_fragment<R: Rng + ?Sized>(base: Vec3, params: &SimParams, rng: &mut R) -> Fragment {
    let jxz = params.direction_jitter_xz;
    let jitter = Vec3::new(
        (rng.gen::<f32>() - 0.5) * 2.0 * jxz,
        rng.gen::<f32>() * params.direction_jitter_y,
        (rng.gen::<f32>() - 0.5) * 2.0 * jxz,
    );
    let direction = (base.normalize_or_zero() + jitter).normalize_or_zero();

    let rotation = Vec3::new(
        rng.gen::<f32>() * PI,
        rng.gen::<f32>() * PI,
        rng.gen::<f32>() * PI,
    );

    let spin = params.spin_rate_max;
    let angular_velocity = Vec3::new(
        (rng.gen::<f32>() - 0.5) * 2.0 * spin,
        (rng.gen::<f32>() - 0.5) * 2.0 * spin,
        (rng.gen::<f32>() - 0.5) * 2.0 * spin,
    );

    Fragment::new(base, direction, rotation, angular_velocity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_dimension_rounds_cube_root() {
        assert_eq!(lattice_dimension(0), 0);
        assert_eq!(lattice_dimension(8), 2);
        assert_eq!(lattice_dimension(110), 5);
        assert_eq!(lattice_dimension(220), 6);
    }

    #[test]
    fn axis_window_covers_every_in_radius_index() {
        let (grid, spacing, radius) = (40, 0.35, 1.8);
        let offset = (grid - 1) as f32 * spacing / 2.0;
        let window = axis_window(grid, spacing, offset, radius);
        for i in 0..grid {
            let c = i as f32 * spacing - offset;
            if c.abs() <= radius {
                assert!(window.contains(&i), "index {i} at {c} skipped");
            }
        }
        assert!(window.len() < grid);
    }

    #[test]
    fn lattice_is_centered_with_upward_bias() {
        let params = SimParams::default();
        let points = lattice_points(8, &params);
        assert_eq!(points.len(), 8);
        let centroid = points.iter().copied().sum::<Vec3>() / points.len() as f32;
        assert!(centroid.x.abs() < 1e-6);
        assert!((centroid.y - params.lattice_y_bias).abs() < 1e-6);
        assert!(centroid.z.abs() < 1e-6);
    }
}
