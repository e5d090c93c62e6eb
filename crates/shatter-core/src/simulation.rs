//! Frame-loop owned simulation state.
//!
//! `Simulation` owns the single live fragment set and its instance buffer.
//! Hosts call [`Simulation::update`] once per rendered frame and upload
//! [`Simulation::instances`] when it is dirty.

use crate::constants::MAX_FRAME_DELTA;
use crate::emitter::{self, InstanceBuffer};
use crate::fragment::Fragment;
use crate::integrator;
use crate::params::{ParamsError, SimParams};
use crate::population;
use rand::prelude::*;

pub struct Simulation {
    params: SimParams,
    capacity: usize,
    fragments: Vec<Fragment>,
    instances: InstanceBuffer,
    rng: StdRng,
}

impl Simulation {
    pub fn new(capacity: usize, params: SimParams, seed: u64) -> Result<Self, ParamsError> {
        params.validate()?;
        let mut sim = Self {
            params,
            capacity,
            fragments: Vec::new(),
            instances: InstanceBuffer::new(capacity),
            rng: StdRng::seed_from_u64(seed),
        };
        sim.regenerate();
        Ok(sim)
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut InstanceBuffer {
        &mut self.instances
    }

    /// Switch capacity tiers. Returns `true` when the population was rebuilt.
    pub fn set_capacity(&mut self, capacity: usize) -> bool {
        if capacity == self.capacity {
            return false;
        }
        self.capacity = capacity;
        self.instances = InstanceBuffer::new(capacity);
        self.regenerate();
        true
    }

    /// Replace the whole fragment set and reseed the instance buffer.
    pub fn regenerate(&mut self) {
        let fresh = population::generate(self.capacity, &self.params, &mut self.rng);
        if fresh.len() < self.capacity {
            log::debug!(
                "lattice under-filled: {} of {} fragments accepted",
                fresh.len(),
                self.capacity
            );
        }
        self.fragments = fresh;
        emitter::seed(&self.fragments, &mut self.instances, &self.params);
        log::info!(
            "generated {} fragments (capacity {})",
            self.fragments.len(),
            self.capacity
        );
    }

    /// Advance one frame and refresh the instance buffer.
    ///
    /// `intensity` is clamped to \[0, 1\]; `delta` is clamped to
    /// \[0, [`MAX_FRAME_DELTA`]\] with NaN treated as zero. Returns the eased
    /// intensity used for this frame.
    pub fn update(&mut self, intensity: f32, delta: f32, clock_sec: f64) -> f32 {
        let intensity = sanitize(intensity, 1.0);
        let delta = sanitize(delta, MAX_FRAME_DELTA);
        let forces = integrator::integrate(&mut self.fragments, intensity, delta, &self.params);
        emitter::emit(
            &self.fragments,
            &mut self.instances,
            &self.params,
            clock_sec,
            forces.t,
        );
        forces.t
    }
}

#[inline]
fn sanitize(v: f32, max: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_handles_nan_and_infinities() {
        assert_eq!(sanitize(f32::NAN, 0.1), 0.0);
        assert_eq!(sanitize(f32::INFINITY, 0.1), 0.1);
        assert_eq!(sanitize(-1.0, 0.1), 0.0);
        assert_eq!(sanitize(0.05, 0.1), 0.05);
    }
}
