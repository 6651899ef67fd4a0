use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Pure translation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Map a point from local space to world space (scale, then rotate, then translate).
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.rotation * (self.scale * local) + self.position
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Overlap test on the X and Z axes only.
    ///
    /// Boxes that merely share a face do not overlap, so a mesh ending exactly
    /// on a grid line is not claimed by the neighbouring cell. A box that is
    /// flat on an axis is tested as a closed interval on that axis.
    pub fn overlaps_xz(&self, other: &Aabb) -> bool {
        axis_overlaps(self.min.x, self.max.x, other.min.x, other.max.x)
            && axis_overlaps(self.min.z, self.max.z, other.min.z, other.max.z)
    }
}

fn axis_overlaps(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    if a_min == a_max || b_min == b_max {
        a_min <= b_max && b_min <= a_max
    } else {
        a_min < b_max && b_min < a_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn transform_point_applies_scale_rotation_translation() {
        let t = Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            scale: Vec3::splat(2.0),
        };
        let p = t.transform_point(Vec3::X);
        // X scaled to 2, rotated +90deg about Y lands on -Z.
        assert!((p - Vec3::new(10.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn aabb_from_points() {
        let b = Aabb::from_points([
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-1.0, 5.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
        ])
        .unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 5.0, 4.0));
        assert_eq!(b.center(), Vec3::new(0.0, 2.5, 2.0));
    }

    #[test]
    fn aabb_from_no_points_is_none() {
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Aabb::new(Vec3::ZERO, Vec3::new(8.0, 1.0, 8.0));
        let b = Aabb::new(Vec3::new(8.0, 0.0, 0.0), Vec3::new(16.0, 1.0, 8.0));
        assert!(!a.overlaps_xz(&b));

        let c = Aabb::new(Vec3::new(7.5, 0.0, 7.5), Vec3::new(8.5, 1.0, 8.5));
        assert!(a.overlaps_xz(&c));
        assert!(b.overlaps_xz(&c));
    }

    #[test]
    fn overlap_ignores_y() {
        let a = Aabb::new(Vec3::ZERO, Vec3::splat(1.0));
        let b = Aabb::new(Vec3::new(0.25, 50.0, 0.25), Vec3::new(0.75, 60.0, 0.75));
        assert!(a.overlaps_xz(&b));
    }

    #[test]
    fn flat_box_on_boundary_overlaps() {
        let cell = Aabb::new(Vec3::ZERO, Vec3::new(8.0, 1.0, 8.0));
        let plane = Aabb::new(Vec3::new(8.0, 0.0, 2.0), Vec3::new(8.0, 1.0, 3.0));
        assert!(cell.overlaps_xz(&plane));
    }
}
