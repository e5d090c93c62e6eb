// Host-side tests for the fragment integrator.

use glam::Vec3;
use rand::{rngs::StdRng, SeedableRng};
use shatter_core::*;

const DT: f32 = 1.0 / 60.0;

fn resting_fragment(base: Vec3) -> Fragment {
    Fragment::new(base, Vec3::Y, Vec3::ZERO, Vec3::new(0.5, -1.0, 0.25))
}

#[test]
fn damping_is_frame_rate_independent() {
    let damping = SimParams::default().damping;
    for d in [1.0 / 30.0, 1.0 / 60.0, 1.0 / 144.0, 0.1] {
        let whole = damping_factor(damping, d);
        let halves = damping_factor(damping, d / 2.0).powi(2);
        assert!(
            (whole - halves).abs() < 1e-6,
            "delta {d}: {whole} vs {halves}"
        );
    }
    // At the reference cadence one step applies the raw factor
    assert!((damping_factor(damping, DT) - damping).abs() < 1e-6);
}

#[test]
fn frame_forces_follow_eased_intensity() {
    let params = SimParams::default();
    let rest = FrameForces::from_intensity(0.0, DT, &params);
    assert_eq!(rest.t, 0.0);
    assert_eq!(rest.explode, 0.0);
    assert_eq!(rest.spring, 40.0);
    assert!((rest.gravity - 0.1).abs() < 1e-6);
    assert!((rest.spin_scale - 0.3).abs() < 1e-6);

    let full = FrameForces::from_intensity(1.0, DT, &params);
    assert_eq!(full.t, 1.0);
    assert_eq!(full.explode, 8.0);
    assert_eq!(full.spring, 80.0);

    // Intensity is eased, not used linearly
    let quarter = FrameForces::from_intensity(0.25, DT, &params);
    assert!((quarter.t - 0.0625).abs() < 1e-6);
}

#[test]
fn ground_contact_at_rest_does_not_bounce() {
    let params = SimParams::default();
    let mut frag = resting_fragment(Vec3::ZERO);
    frag.position = Vec3::new(0.3, params.ground_y, -0.2);
    frag.velocity = Vec3::new(0.5, 0.0, 0.5);
    let before = frag.clone();
    collide_ground(&mut frag, &params);
    assert_eq!(frag, before);
}

#[test]
fn ground_bounce_only_while_falling() {
    let params = SimParams::default();

    let mut falling = resting_fragment(Vec3::ZERO);
    falling.position.y = params.ground_y - 0.1;
    falling.velocity = Vec3::new(1.0, -2.0, -1.0);
    collide_ground(&mut falling, &params);
    assert_eq!(falling.position.y, params.ground_y);
    assert!((falling.velocity.y - 0.9).abs() < 1e-6);
    assert!((falling.velocity.x - 0.9).abs() < 1e-6);
    assert!((falling.velocity.z + 0.9).abs() < 1e-6);

    let mut rising = resting_fragment(Vec3::ZERO);
    rising.position.y = params.ground_y - 0.1;
    rising.velocity = Vec3::new(1.0, 0.5, 0.0);
    collide_ground(&mut rising, &params);
    assert_eq!(rising.position.y, params.ground_y);
    assert_eq!(rising.velocity, Vec3::new(1.0, 0.5, 0.0));
}

#[test]
fn lateral_bounds_clamp_and_reflect() {
    let params = SimParams::default();
    let forces = FrameForces::from_intensity(0.4, DT, &params);

    let mut frag = resting_fragment(Vec3::new(0.2, 0.5, 0.0));
    frag.position.x = params.bounds + 5.0;
    frag.velocity = Vec3::new(3.0, 0.0, 0.0);

    // Velocity just before the wall is reached in this step
    let mut unclamped = frag.clone();
    accelerate(&mut unclamped, &forces, DT);
    advance(&mut unclamped, DT);
    let pre_clamp = unclamped.velocity.x;

    step_fragment(&mut frag, &forces, &params, DT);
    assert_eq!(frag.position.x, params.bounds);
    assert_eq!(frag.velocity.x, pre_clamp * -params.wall_restitution);
    assert!(frag.velocity.x.signum() != pre_clamp.signum());
}

#[test]
fn lateral_axes_clamp_independently() {
    let params = SimParams::default();
    let mut frag = resting_fragment(Vec3::ZERO);
    frag.position = Vec3::new(-(params.bounds + 1.0), 0.0, params.bounds + 2.0);
    frag.velocity = Vec3::new(-1.0, 0.0, 2.0);
    clamp_lateral(&mut frag, &params);
    assert_eq!(frag.position.x, -params.bounds);
    assert_eq!(frag.position.z, params.bounds);
    assert!((frag.velocity.x - 0.55).abs() < 1e-6);
    assert!((frag.velocity.z + 1.1).abs() < 1e-6);
}

#[test]
fn spin_scales_with_intensity() {
    let params = SimParams::default();
    let mut slow = resting_fragment(Vec3::ZERO);
    let mut fast = slow.clone();
    spin(&mut slow, &FrameForces::from_intensity(0.0, DT, &params), DT);
    spin(&mut fast, &FrameForces::from_intensity(1.0, DT, &params), DT);
    assert!((slow.rotation.x - 0.5 * DT * 0.3).abs() < 1e-7);
    assert!((fast.rotation.x - 0.5 * DT * 1.4).abs() < 1e-7);
    assert!((fast.rotation.y + DT * 1.4).abs() < 1e-7);
}

#[test]
fn fixed_attributes_survive_integration() {
    let params = SimParams::default();
    let mut fragments = generate(64, &params, &mut StdRng::seed_from_u64(21));
    let before: Vec<_> = fragments
        .iter()
        .map(|f| (f.base_position(), f.direction(), f.angular_velocity()))
        .collect();
    for i in 0..120 {
        integrate(&mut fragments, (i as f32 / 120.0).min(1.0), DT, &params);
    }
    for (f, (base, dir, spin)) in fragments.iter().zip(before) {
        assert_eq!(f.base_position(), base);
        assert_eq!(f.direction(), dir);
        assert_eq!(f.angular_velocity(), spin);
    }
}

#[test]
fn zero_intensity_settles_home() {
    let params = SimParams::default();
    let mut fragments = generate(8, &params, &mut StdRng::seed_from_u64(8));
    assert_eq!(fragments.len(), 8);
    // Knock everything off its base first
    for f in &mut fragments {
        f.position += f.direction() * 0.5;
        f.velocity = Vec3::new(0.3, -0.2, 0.1);
    }
    for _ in 0..300 {
        integrate(&mut fragments, 0.0, DT, &params);
    }
    // Residual gravity at rest balances the spring slightly below base
    let sag = params.gravity.from * GRAVITY * GRAVITY_SCALE / params.spring.from;
    for f in &fragments {
        let home = f.base_position() - Vec3::Y * sag;
        assert!(
            f.position.distance(home) < 1e-3,
            "fragment at {:?} did not settle near {:?}",
            f.position,
            home
        );
        assert!(f.position.distance(f.base_position()) < 1e-2);
    }
}

#[test]
fn full_intensity_never_sinks_below_ground() {
    let params = SimParams::default();
    let mut fragments = generate(DESKTOP_CAPACITY, &params, &mut StdRng::seed_from_u64(13));
    let mut touched = false;
    for _ in 0..600 {
        integrate(&mut fragments, 1.0, DT, &params);
        for f in &fragments {
            assert!(f.position.y >= params.ground_y);
            assert!(f.position.x.abs() <= params.bounds);
            assert!(f.position.z.abs() <= params.bounds);
            touched |= f.position.y == params.ground_y;
        }
    }
    assert!(touched, "expected some fragments to reach the ground");
}

#[test]
fn zero_delta_is_a_no_op() {
    let params = SimParams::default();
    let mut fragments = generate(27, &params, &mut StdRng::seed_from_u64(2));
    for _ in 0..10 {
        integrate(&mut fragments, 0.7, DT, &params);
    }
    let snapshot = fragments.clone();
    integrate(&mut fragments, 0.7, 0.0, &params);
    assert_eq!(fragments, snapshot);
}

// With `--features parallel` this checks the rayon path; either way
// `integrate` must match a plain in-order loop bit for bit.
#[test]
fn parallel_integrate_matches_serial_loop() {
    let params = SimParams::default();
    let mut parallel = generate(DESKTOP_CAPACITY, &params, &mut StdRng::seed_from_u64(31));
    let mut serial = parallel.clone();
    for i in 0..300 {
        let intensity = ((i as f32) / 150.0).min(1.0) * 0.9;
        integrate(&mut parallel, intensity, DT, &params);
        let forces = FrameForces::from_intensity(intensity, DT, &params);
        for frag in serial.iter_mut() {
            step_fragment(frag, &forces, &params, DT);
        }
    }
    assert_eq!(parallel, serial);
}
