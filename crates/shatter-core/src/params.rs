//! Tunable simulation parameters.
//!
//! `SimParams::default()` reproduces the reference look. Frontends may tweak
//! individual values, but should run [`SimParams::validate`] before handing
//! them to a [`crate::Simulation`].

use crate::easing::lerp;
use thiserror::Error;

/// A scalar that is interpolated by the eased fragmentation intensity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub from: f32,
    pub to: f32,
}

impl Span {
    pub const fn new(from: f32, to: f32) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn at(&self, t: f32) -> f32 {
        lerp(self.from, self.to, t)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimParams {
    // Population lattice
    pub lattice_spacing: f32,
    pub lattice_y_bias: f32,
    pub acceptance_radius: f32,
    pub direction_jitter_xz: f32, // half-width of the X/Z jitter
    pub direction_jitter_y: f32,  // upper bound of the upward-only Y jitter
    pub spin_rate_max: f32,

    // Per-frame forces, interpolated by eased intensity
    pub explode: Span,
    pub spring: Span,
    pub gravity: Span,
    pub spin_scale: Span,
    pub damping: f32,

    // Collisions
    pub ground_y: f32,
    pub ground_restitution: f32,
    pub ground_friction: f32,
    pub bounds: f32,
    pub wall_restitution: f32,

    // Cosmetic scale pulse
    pub base_scale: f32,
    pub pulse_amplitude: f32,
    pub pulse_speed: f32,
    pub pulse_blend: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            lattice_spacing: 0.35,
            lattice_y_bias: 0.3,
            acceptance_radius: 1.8,
            direction_jitter_xz: 0.4,
            direction_jitter_y: 0.6,
            spin_rate_max: 1.0,

            explode: Span::new(0.0, 8.0),
            spring: Span::new(40.0, 80.0),
            gravity: Span::new(0.1, 0.6),
            spin_scale: Span::new(0.3, 1.4),
            damping: 0.86,

            ground_y: -1.4,
            ground_restitution: 0.45,
            ground_friction: 0.9,
            bounds: 4.2,
            wall_restitution: 0.55,

            base_scale: 0.22,
            pulse_amplitude: 0.25,
            pulse_speed: 1.0,
            pulse_blend: 0.25,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("parameter `{0}` is not finite")]
    NonFinite(&'static str),
    #[error("parameter `{name}` must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("damping must be in (0, 1], got {0}")]
    Damping(f32),
    #[error("restitution `{name}` must be in [0, 1], got {value}")]
    Restitution { name: &'static str, value: f32 },
}

impl SimParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        let scalars = [
            ("lattice_spacing", self.lattice_spacing),
            ("lattice_y_bias", self.lattice_y_bias),
            ("acceptance_radius", self.acceptance_radius),
            ("direction_jitter_xz", self.direction_jitter_xz),
            ("direction_jitter_y", self.direction_jitter_y),
            ("spin_rate_max", self.spin_rate_max),
            ("explode.from", self.explode.from),
            ("explode.to", self.explode.to),
            ("spring.from", self.spring.from),
            ("spring.to", self.spring.to),
            ("gravity.from", self.gravity.from),
            ("gravity.to", self.gravity.to),
            ("spin_scale.from", self.spin_scale.from),
            ("spin_scale.to", self.spin_scale.to),
            ("damping", self.damping),
            ("ground_y", self.ground_y),
            ("ground_restitution", self.ground_restitution),
            ("ground_friction", self.ground_friction),
            ("bounds", self.bounds),
            ("wall_restitution", self.wall_restitution),
            ("base_scale", self.base_scale),
            ("pulse_amplitude", self.pulse_amplitude),
            ("pulse_speed", self.pulse_speed),
            ("pulse_blend", self.pulse_blend),
        ];
        if let Some(&(name, _)) = scalars.iter().find(|&&(_, v)| !v.is_finite()) {
            return Err(ParamsError::NonFinite(name));
        }

        for (name, value) in [
            ("lattice_spacing", self.lattice_spacing),
            ("acceptance_radius", self.acceptance_radius),
            ("bounds", self.bounds),
            ("base_scale", self.base_scale),
        ] {
            if value <= 0.0 {
                return Err(ParamsError::NonPositive { name, value });
            }
        }

        if self.damping <= 0.0 || self.damping > 1.0 {
            return Err(ParamsError::Damping(self.damping));
        }

        for (name, value) in [
            ("ground_restitution", self.ground_restitution),
            ("ground_friction", self.ground_friction),
            ("wall_restitution", self.wall_restitution),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParamsError::Restitution { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimParams::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_unstable_damping() {
        let params = SimParams {
            damping: 1.2,
            ..SimParams::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::Damping(1.2)));
    }

    #[test]
    fn rejects_nan_before_range_checks() {
        let params = SimParams {
            bounds: f32::NAN,
            ..SimParams::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::NonFinite("bounds")));
    }

    #[test]
    fn span_interpolates_endpoints() {
        let s = Span::new(40.0, 80.0);
        assert_eq!(s.at(0.0), 40.0);
        assert_eq!(s.at(1.0), 80.0);
        assert_eq!(s.at(0.5), 60.0);
    }
}
