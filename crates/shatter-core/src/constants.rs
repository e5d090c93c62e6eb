use glam::Vec3;

// Shared scene tuning constants used by the core and the native frontend.

// Capacity tiers
pub const DESKTOP_CAPACITY: usize = 220;
pub const MOBILE_CAPACITY: usize = 110;
pub const MOBILE_BREAKPOINT_PX: f32 = 768.0; // widths below this use the mobile tier

// Scroll mapping
pub const SCROLL_OVERSHOOT: f32 = 1.3; // fragmentation saturates before the end of the page

// Physics
pub const GRAVITY: f32 = 9.81;
pub const GRAVITY_SCALE: f32 = 0.25;
pub const DAMPING_REFERENCE_FPS: f32 = 60.0; // damping is tuned per step at this cadence
pub const MAX_FRAME_DELTA: f32 = 0.1; // seconds; longer stalls are integrated as this

// Visual sizing
pub const FRAGMENT_SIZE: f32 = 0.22; // edge length of a fragment cube at scale 1
pub const CORE_RADIUS: f32 = 1.4; // intact core mesh radius

pub const GROUND_SIZE: f32 = 32.0; // edge length of the visible ground plane

// Camera
pub const CAMERA_BASE_EYE: [f32; 3] = [0.0, 0.6, 8.0];
pub const CAMERA_EXPLODED_EYE: [f32; 3] = [0.0, 1.5, 11.0];
pub const CAMERA_LOOK_Y: [f32; 2] = [0.4, 0.9]; // look-at height, assembled -> exploded
pub const CAMERA_FOLLOW_RATE: f32 = 3.0; // exponential smoothing rate (1/s)
pub const CAMERA_FOVY_DEG: f32 = 45.0;

// Backdrop
pub const BACKDROP_COUNT: usize = 900;
pub const BACKDROP_RADIUS: f32 = 12.0;

// Atmosphere and post-processing
pub const BACKGROUND_RGB: [f32; 3] = [0.008, 0.024, 0.09]; // #020617
pub const FOG_NEAR: f32 = 8.0;
pub const FOG_FAR: f32 = 26.0;
pub const BLOOM_INTENSITY: f32 = 0.6;
pub const BLOOM_THRESHOLD: f32 = 0.15;
pub const BLOOM_SMOOTHING: f32 = 0.2;
pub const VIGNETTE_OFFSET: f32 = 0.2;
pub const VIGNETTE_DARKNESS: f32 = 0.7;

#[inline]
pub fn camera_base_eye() -> Vec3 {
    Vec3::from(CAMERA_BASE_EYE)
}

#[inline]
pub fn camera_exploded_eye() -> Vec3 {
    Vec3::from(CAMERA_EXPLODED_EYE)
}
