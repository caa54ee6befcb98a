/// A closed range of real values, empty when `min > max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Contains nothing; the identity for [`Interval::surrounding`].
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    /// The unit interval [0, 1], used for texture coordinates and quad interiors.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Closed test, `min <= x <= max`.
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Open test, `min < x < max`. Hit intervals use this form.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamp into `[min, max]`; unlike `f32::clamp`, fine on empty intervals.
    pub fn clamp(&self, x: f32) -> f32 {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }

    /// Grow by `delta` in total, half on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    pub fn add_scalar(&self, displacement: f32) -> Interval {
        Interval::new(self.min + displacement, self.max + displacement)
    }

    /// Smallest interval containing both.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_versus_open_membership() {
        let t = Interval::new(0.001, 5.0);

        for x in [0.001, 5.0] {
            assert!(t.contains(x));
            assert!(!t.surrounds(x));
        }
        assert!(t.surrounds(2.0));
        assert!(!t.contains(5.5) && !t.surrounds(-1.0));
        assert_eq!(t.size(), 5.0 - 0.001);
    }

    #[test]
    fn test_clamp_to_display_range() {
        let intensity = Interval::new(0.0, 0.999);
        assert_eq!(intensity.clamp(-0.3), 0.0);
        assert_eq!(intensity.clamp(0.42), 0.42);
        assert_eq!(intensity.clamp(12.0), 0.999);

        // min > max, still no panic
        assert_eq!(Interval::EMPTY.clamp(1.0), f32::INFINITY);
    }

    #[test]
    fn test_expand_and_shift() {
        let padded = Interval::new(2.0, 2.0).expand(0.5);
        assert_eq!(padded, Interval::new(1.75, 2.25));
        assert_eq!(padded.add_scalar(-2.0), Interval::new(-0.25, 0.25));
    }

    #[test]
    fn test_surrounding_identity_is_empty() {
        let a = Interval::new(-1.0, 4.0);
        let b = Interval::new(3.0, 9.0);

        assert_eq!(Interval::surrounding(&a, &b), Interval::new(-1.0, 9.0));
        assert_eq!(Interval::surrounding(&Interval::default(), &a), a);
        assert!(Interval::default().is_empty());
        assert!(!Interval::UNIVERSE.is_empty());
        assert!(Interval::UNIVERSE.surrounds(f32::MAX));
    }
}
