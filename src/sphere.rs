//! Sphere primitive for ray tracing.
//!
//! Implements ray-sphere intersection using an optimized quadratic formula,
//! plus uniform surface sampling for the direct-light estimator.

use std::f64::consts::PI;

use glam::DVec3;
use rand::Rng;

use crate::interval::Interval;
use crate::random;

/// Sphere defined by center and radius.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: DVec3,
    /// Radius of the sphere (always non-negative).
    pub radius: f64,
}

impl Sphere {
    /// Create a new sphere. Negative radius values are clamped to 0.0.
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Smallest ray parameter inside `range` at which the ray strikes the
    /// sphere, or `None` on a miss.
    pub fn intersect(&self, origin: DVec3, direction: DVec3, range: Interval) -> Option<f64> {
        // Vector from ray origin to sphere center
        let oc = self.center - origin;

        // Optimized quadratic equation coefficients
        let a = direction.length_squared();
        let h = direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Find the nearest root that lies in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !range.surrounds(root) {
            root = (h + sqrtd) / a;
            if !range.surrounds(root) {
                return None;
            }
        }
        Some(root)
    }

    /// Outward unit normal at a point on the sphere surface.
    pub fn normal_at(&self, point: DVec3) -> DVec3 {
        (point - self.center) / self.radius
    }

    /// Surface area.
    pub fn area(&self) -> f64 {
        4.0 * PI * self.radius * self.radius
    }

    /// Uniform random point on the surface, with its outward normal.
    pub fn sample_surface<R: Rng>(&self, rng: &mut R) -> (DVec3, DVec3) {
        let normal = random::uniform_sphere(rng);
        (self.center + normal * self.radius, normal)
    }
}
