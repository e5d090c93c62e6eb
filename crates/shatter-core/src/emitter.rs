//! Instance transform emitter.
//!
//! Converts fragment kinematic state into column-major model matrices laid
//! out for instanced drawing. The uniform scale carries a small cosmetic
//! pulse derived from an external clock; it is never written back into
//! fragment state.

use crate::easing::lerp;
use crate::fragment::Fragment;
use crate::params::SimParams;
use bytemuck::Zeroable;
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    pub fn from_mat4(m: Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

/// Fixed-size instance storage plus a dirty flag for re-upload.
#[derive(Clone, Debug)]
pub struct InstanceBuffer {
    slots: Vec<InstanceRaw>,
    len: usize,
    dirty: bool,
}

impl InstanceBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![InstanceRaw::zeroed(); capacity],
            len: 0,
            dirty: true,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots holding a live instance.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<&InstanceRaw> {
        self.live().get(index)
    }

    /// Live instances, in fragment order.
    pub fn live(&self) -> &[InstanceRaw] {
        &self.slots[..self.len]
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.live())
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether an upload is pending and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Write `transforms` into the leading slots; extra transforms beyond the
    /// capacity are dropped.
    pub fn write<I>(&mut self, transforms: I)
    where
        I: IntoIterator<Item = Mat4>,
    {
        let mut written = 0;
        for (slot, m) in self.slots.iter_mut().zip(transforms) {
            *slot = InstanceRaw::from_mat4(m);
            written += 1;
        }
        for slot in &mut self.slots[written..self.len.max(written)] {
            *slot = InstanceRaw::zeroed();
        }
        self.len = written;
        self.mark_dirty();
    }
}

/// Translation, then XYZ Euler rotation, then uniform scale.
pub fn compose_transform(position: Vec3, rotation: Vec3, scale: f32) -> Mat4 {
    Mat4::from_translation(position)
        * Mat4::from_rotation_x(rotation.x)
        * Mat4::from_rotation_y(rotation.y)
        * Mat4::from_rotation_z(rotation.z)
        * Mat4::from_scale(Vec3::splat(scale))
}

/// Cosmetic scale for fragment `index`, blended toward the pulse by `t`.
pub fn pulse_scale(index: usize, clock_sec: f64, t: f32, params: &SimParams) -> f32 {
    let phase = (clock_sec * params.pulse_speed as f64 + index as f64).sin() as f32;
    let pulse = 1.0 + params.pulse_amplitude * phase;
    params.base_scale * lerp(1.0, pulse, t * params.pulse_blend)
}

/// Seed the buffer after generation with each fragment's resting transform.
pub fn seed(fragments: &[Fragment], buffer: &mut InstanceBuffer, params: &SimParams) {
    buffer.write(
        fragments
            .iter()
            .map(|f| compose_transform(f.position, f.rotation, params.base_scale)),
    );
}

/// Write this frame's transforms. `t` is the eased intensity used by the
/// integrator for the same frame.
pub fn emit(
    fragments: &[Fragment],
    buffer: &mut InstanceBuffer,
    params: &SimParams,
    clock_sec: f64,
    t: f32,
) {
    debug_assert!(fragments.len() <= buffer.capacity());
    buffer.write(fragments.iter().enumerate().map(|(i, f)| {
        compose_transform(f.position, f.rotation, pulse_scale(i, clock_sec, t, params))
    }));
}
