use glam::Vec3;

/// One simulated piece of the deconstructed solid.
///
/// `base_position`, `direction` and `angular_velocity` are fixed at creation;
/// only the kinematic state (`position`, `velocity`, `rotation`) is mutated by
/// the integrator. `rotation` holds independent Euler angles applied in XYZ
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    base_position: Vec3,
    direction: Vec3,
    angular_velocity: Vec3,
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Vec3,
}

impl Fragment {
    /// Create a fragment at rest on its base position.
    pub fn new(
        base_position: Vec3,
        direction: Vec3,
        rotation: Vec3,
        angular_velocity: Vec3,
    ) -> Self {
        Self {
            base_position,
            direction,
            angular_velocity,
            position: base_position,
            velocity: Vec3::ZERO,
            rotation,
        }
    }

    #[inline]
    pub fn base_position(&self) -> Vec3 {
        self.base_position
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }
}
