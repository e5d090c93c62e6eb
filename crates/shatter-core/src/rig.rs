//! Camera and lighting driven by fragmentation intensity.
//!
//! These types avoid platform-specific APIs so every frontend can share them.
//! The camera follows the eased intensity with exponential smoothing; lights
//! and the intact core's material respond linearly.

use crate::constants::*;
use crate::easing::{ease_in_out_cubic, exp_smoothing, lerp, lerp_vec3};
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Camera that eases from the assembled framing to a wider exploded one.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub eye: Vec3,
    pub look_y: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            eye: camera_base_eye(),
            look_y: CAMERA_LOOK_Y[0],
        }
    }
}

impl CameraRig {
    pub fn update(&mut self, intensity: f32, delta: f32) {
        let t = ease_in_out_cubic(intensity);
        let target = lerp_vec3(camera_base_eye(), camera_exploded_eye(), t);
        self.eye = lerp_vec3(self.eye, target, exp_smoothing(CAMERA_FOLLOW_RATE, delta));
        self.look_y = lerp(CAMERA_LOOK_Y[0], CAMERA_LOOK_Y[1], t);
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.eye,
            target: Vec3::new(0.0, self.look_y, 0.0),
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

/// Light levels for ambient fill, directional key and rim point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightLevels {
    pub key: f32,
    pub fill: f32,
    pub rim: f32,
}

impl LightLevels {
    pub fn from_intensity(intensity: f32) -> Self {
        Self {
            key: lerp(1.1, 1.7, intensity),
            fill: lerp(0.2, 0.5, intensity),
            rim: lerp(0.6, 1.2, intensity),
        }
    }
}

/// Material of the intact core mesh, which fades out as fragments take over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoreAppearance {
    pub opacity: f32,
    pub emissive: f32,
}

impl CoreAppearance {
    pub fn from_intensity(intensity: f32) -> Self {
        Self {
            opacity: lerp(0.9, 0.05, intensity),
            emissive: lerp(0.7, 0.15, intensity),
        }
    }
}
