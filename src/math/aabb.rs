use glam::Vec3;

/// Axis-aligned bounds in scene coordinates
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds of a point set, `None` when it is empty
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<AABB> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(AABB::new(first, first), |aabb, p| AABB {
            min: aabb.min.min(*p),
            max: aabb.max.max(*p),
        }))
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the bounding sphere around `center()`
    pub fn radius(&self) -> f32 {
        (self.max - self.min).length() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let points = [
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 4.0, 2.0),
            Vec3::new(0.0, 0.0, -3.0),
        ];
        let aabb = AABB::from_points(&points).unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 2.0));
    }

    #[test]
    fn test_aabb_from_no_points() {
        let points: [Vec3; 0] = [];
        assert!(AABB::from_points(&points).is_none());
    }

    #[test]
    fn test_aabb_center_and_radius() {
        let aabb = AABB::new(Vec3::new(-2.0, -4.0, -4.0), Vec3::new(2.0, 4.0, 4.0));
        assert_eq!(aabb.center(), Vec3::ZERO);
        assert!((aabb.radius() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_aabb_union_non_overlapping() {
        let aabb1 = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let aabb2 = AABB::new(Vec3::new(2.0, 2.0, 2.0), Vec3::new(3.0, 3.0, 3.0));
        let union = aabb1.union(&aabb2);
        assert_eq!(union.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(union.max, Vec3::new(3.0, 3.0, 3.0));
    }
}
