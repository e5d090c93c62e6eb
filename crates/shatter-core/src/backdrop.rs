//! Slowly rotating point field around the scene.

use crate::constants::{BACKDROP_COUNT, BACKDROP_RADIUS};
use crate::easing::lerp;
use crate::emitter::InstanceBuffer;
use glam::{Mat4, Vec3};
use rand::Rng;
use std::f32::consts::PI;

#[derive(Clone, Debug)]
pub struct Backdrop {
    points: Vec<Vec3>,
    spin_y: f32,
    tilt_x: f32,
}

impl Backdrop {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_count(BACKDROP_COUNT, rng)
    }

    /// Scatter `count` points in a flattened shell biased toward the core.
    pub fn with_count<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let points = (0..count)
            .map(|_| {
                let r = BACKDROP_RADIUS * (0.3 + rng.gen::<f32>() * 0.7);
                let theta = rng.gen::<f32>() * PI * 2.0;
                let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
                Vec3::new(
                    r * phi.sin() * theta.cos(),
                    r * phi.cos() * 0.6,
                    r * phi.sin() * theta.sin(),
                )
            })
            .collect();
        Self {
            points,
            spin_y: 0.0,
            tilt_x: 0.15,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn update(&mut self, scroll_progress: f32, delta: f32) {
        let scroll_factor = lerp(0.4, 1.8, scroll_progress);
        self.spin_y += delta * 0.06 * scroll_factor;
        self.tilt_x = lerp(0.15, 0.5, scroll_progress);
    }

    pub fn rotation(&self) -> Mat4 {
        Mat4::from_rotation_x(self.tilt_x) * Mat4::from_rotation_y(self.spin_y)
    }

    pub fn point_size(scroll_progress: f32) -> f32 {
        lerp(0.02, 0.045, scroll_progress)
    }

    pub fn opacity(scroll_progress: f32) -> f32 {
        lerp(0.25, 0.6, scroll_progress)
    }

    /// Write one instance per point, sized for the current scroll position.
    pub fn emit(&self, buffer: &mut InstanceBuffer, scroll_progress: f32) {
        let rotation = self.rotation();
        let scale = Mat4::from_scale(Vec3::splat(Self::point_size(scroll_progress)));
        buffer.write(
            self.points
                .iter()
                .map(|p| rotation * Mat4::from_translation(*p) * scale),
        );
    }
}
