//! Infinite plane primitive in point-normal form.

use glam::DVec3;

use crate::interval::Interval;

/// Plane through `point` with unit normal `normal`.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Any point on the plane.
    pub point: DVec3,
    /// Unit normal of the plane.
    pub normal: DVec3,
}

impl Plane {
    /// Create a new plane. The normal is normalized on construction.
    pub fn new(point: DVec3, normal: DVec3) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Ray parameter inside `range` at which the ray crosses the plane, or
    /// `None` when the ray is parallel or the crossing is out of range.
    pub fn intersect(&self, origin: DVec3, direction: DVec3, range: Interval) -> Option<f64> {
        let denominator = direction.dot(self.normal);
        if denominator.abs() < 1e-12 {
            return None;
        }
        let t = (self.point - origin).dot(self.normal) / denominator;
        range.surrounds(t).then_some(t)
    }

    /// The plane normal; the same everywhere on the surface.
    pub fn normal_at(&self, _point: DVec3) -> DVec3 {
        self.normal
    }
}
