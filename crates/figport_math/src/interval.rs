/// Extent of a bounding box along one axis, `[min, max]` inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Length of the extent; zero for flat geometry.
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// No geometry has been accumulated (min > max).
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Smallest interval covering both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Identity for [`Interval::surrounding`].
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-0.5, 0.5).size(), 1.0);
        assert_eq!(Interval::new(3.0, 3.0).size(), 0.0);
    }

    #[test]
    fn test_flat_interval_is_not_empty() {
        assert!(!Interval::new(0.0, 0.0).is_empty());
        assert!(Interval::EMPTY.is_empty());
    }

    #[test]
    fn test_interval_surrounding_with_empty() {
        let a = Interval::new(1.0, 5.0);
        assert_eq!(Interval::surrounding(&Interval::EMPTY, &a), a);
        assert_eq!(
            Interval::surrounding(&a, &Interval::new(-2.0, 3.0)),
            Interval::new(-2.0, 5.0)
        );
    }
}
