//! Per-fragment integrator.
//!
//! Each frame a fragment is pulled by an explicit spring toward a target
//! displaced along its explosion direction, pushed down by scroll-gated
//! gravity, damped, advanced with semi-implicit Euler and then kept inside
//! the ground plane and the soft lateral walls. The stages below must run in
//! order; [`step_fragment`] chains them.

use crate::constants::{DAMPING_REFERENCE_FPS, GRAVITY, GRAVITY_SCALE};
use crate::easing::ease_in_out_cubic;
use crate::fragment::Fragment;
use crate::params::SimParams;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Force parameters shared by every fragment for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameForces {
    /// Eased intensity.
    pub t: f32,
    pub explode: f32,
    pub spring: f32,
    pub gravity: f32,
    pub spin_scale: f32,
    /// Velocity multiplier for this frame's `delta`.
    pub damping: f32,
}

impl FrameForces {
    pub fn from_intensity(intensity: f32, delta: f32, params: &SimParams) -> Self {
        let t = ease_in_out_cubic(intensity);
        Self {
            t,
            explode: params.explode.at(t),
            spring: params.spring.at(t),
            gravity: params.gravity.at(t),
            spin_scale: params.spin_scale.at(t),
            damping: damping_factor(params.damping, delta),
        }
    }
}

/// Per-step damping normalised to a 60 steps/s cadence.
#[inline]
pub fn damping_factor(damping: f32, delta: f32) -> f32 {
    damping.powf(delta * DAMPING_REFERENCE_FPS)
}

/// Spring toward the target, gravity and damping.
#[inline]
pub fn accelerate(frag: &mut Fragment, forces: &FrameForces, delta: f32) {
    let target = frag.base_position() + frag.direction() * forces.explode;
    frag.velocity += (target - frag.position) * (forces.spring * delta);
    frag.velocity.y -= forces.gravity * delta * GRAVITY * GRAVITY_SCALE;
    frag.velocity *= forces.damping;
}

#[inline]
pub fn advance(frag: &mut Fragment, delta: f32) {
    frag.position += frag.velocity * delta;
}

/// Clamp to the ground plane, bouncing only while still moving downward.
#[inline]
pub fn collide_ground(frag: &mut Fragment, params: &SimParams) {
    if frag.position.y < params.ground_y {
        frag.position.y = params.ground_y;
        if frag.velocity.y < 0.0 {
            frag.velocity.y *= -params.ground_restitution;
            frag.velocity.x *= params.ground_friction;
            frag.velocity.z *= params.ground_friction;
        }
    }
}

/// Reflect off the soft X/Z walls, each axis independently.
#[inline]
pub fn clamp_lateral(frag: &mut Fragment, params: &SimParams) {
    let b = params.bounds;
    if frag.position.x.abs() > b {
        frag.position.x = frag.position.x.clamp(-b, b);
        frag.velocity.x *= -params.wall_restitution;
    }
    if frag.position.z.abs() > b {
        frag.position.z = frag.position.z.clamp(-b, b);
        frag.velocity.z *= -params.wall_restitution;
    }
}

#[inline]
pub fn spin(frag: &mut Fragment, forces: &FrameForces, delta: f32) {
    frag.rotation += frag.angular_velocity() * (delta * forces.spin_scale);
}

pub fn step_fragment(frag: &mut Fragment, forces: &FrameForces, params: &SimParams, delta: f32) {
    accelerate(frag, forces, delta);
    advance(frag, delta);
    collide_ground(frag, params);
    clamp_lateral(frag, params);
    spin(frag, forces, delta);
}

/// Advance every fragment by `delta` seconds.
///
/// `intensity` is eased here before any force is derived. `delta` must already
/// be finite and non-negative; see [`crate::Simulation::update`].
pub fn integrate(
    fragments: &mut [Fragment],
    intensity: f32,
    delta: f32,
    params: &SimParams,
) -> FrameForces {
    let forces = FrameForces::from_intensity(intensity, delta, params);

    #[cfg(feature = "parallel")]
    {
        fragments
            .par_iter_mut()
            .for_each(|frag| step_fragment(frag, &forces, params, delta));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for frag in fragments.iter_mut() {
            step_fragment(frag, &forces, params, delta);
        }
    }

    forces
}
