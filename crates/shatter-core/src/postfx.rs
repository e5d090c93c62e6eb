//! Fog, bloom and vignette settings.
//!
//! The GPU work lives in `shaders/scene.wgsl` (fog) and `shaders/post.wgsl`
//! (bloom, vignette). The scalar curves here are the CPU reference for those
//! shaders and must stay in step with them.

use crate::constants::*;

/// Hermite smoothstep; `edge0 > edge1` yields the mirrored curve.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear-range fog blended over view depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: BACKGROUND_RGB,
            near: FOG_NEAR,
            far: FOG_FAR,
        }
    }
}

impl Fog {
    /// Fraction of fog colour mixed in at `depth`.
    pub fn factor(&self, depth: f32) -> f32 {
        smoothstep(self.near, self.far, depth)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bloom {
    pub intensity: f32,
    pub threshold: f32,
    pub smoothing: f32,
}

impl Default for Bloom {
    fn default() -> Self {
        Self {
            intensity: BLOOM_INTENSITY,
            threshold: BLOOM_THRESHOLD,
            smoothing: BLOOM_SMOOTHING,
        }
    }
}

impl Bloom {
    /// Bright-pass weight for a pixel of luminance `luma`.
    pub fn mask(&self, luma: f32) -> f32 {
        smoothstep(self.threshold, self.threshold + self.smoothing, luma)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vignette {
    pub offset: f32,
    pub darkness: f32,
}

impl Default for Vignette {
    fn default() -> Self {
        Self {
            offset: VIGNETTE_OFFSET,
            darkness: VIGNETTE_DARKNESS,
        }
    }
}

impl Vignette {
    /// Brightness multiplier at screen coordinate `uv` in \[0, 1\]².
    pub fn factor(&self, uv: [f32; 2]) -> f32 {
        let d = ((uv[0] - 0.5).powi(2) + (uv[1] - 0.5).powi(2)).sqrt();
        1.0 - smoothstep(self.offset * 0.799, 0.8, d * (self.darkness + self.offset))
    }
}

/// Rec. 709 luminance, as used by the bright pass.
#[inline]
pub fn luminance(rgb: [f32; 3]) -> f32 {
    0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2]
}
