/// Closed range of ray parameters or colour values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Valid hit distances for a ray: strictly positive, strictly below `t_max`.
    pub fn hit_range(t_max: f32) -> Self {
        Self::new(0.0, t_max)
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// The unit interval, used for display values.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_range_excludes_endpoints() {
        let range = Interval::hit_range(4.0);

        assert!(!range.surrounds(0.0));
        assert!(!range.surrounds(4.0));
        assert!(!range.surrounds(-1.0));
        assert!(range.surrounds(1e-6));
        assert!(range.surrounds(3.999));
    }

    #[test]
    fn test_unit_clamp() {
        assert_eq!(Interval::UNIT.clamp(-5.0), 0.0);
        assert_eq!(Interval::UNIT.clamp(0.5), 0.5);
        assert_eq!(Interval::UNIT.clamp(15.0), 1.0);
    }
}
