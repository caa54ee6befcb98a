use crate::Vec3;

/// A ray in 3D space with origin, direction, and time.
///
/// The `time` field lies in [0, 1] and selects which instant of a moving
/// object the ray observes (motion blur).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    time: f32,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// A ray at time 0, for static geometry.
    #[inline]
    pub fn new_simple(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0.0)
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unnormalized direction; `t` is measured in multiples of its length.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// `origin + t * direction`
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }

    /// The same ray with its origin shifted by `-offset`.
    ///
    /// Hit parameters `t` are unchanged by the shift.
    #[inline]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.origin - offset, self.direction, self.time)
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new_simple(Vec3::ZERO, Vec3::Z)
    }
}
