//! Scene representation: surfaces, emitters, sky and direct lighting.
//!
//! The scene owns every surface for the duration of a render; rays refer to
//! them through small index handles. Non-emitters ("things") carry a material
//! and arbitrary part geometry, emitters ("lights") are sphere-shaped so the
//! direct-light estimator can sample their area.

use std::f64::consts::PI;

use glam::DVec3;
use rand::Rng;

use crate::interval::Interval;
use crate::material::{Color, Material, BLACK};
use crate::plane::Plane;
use crate::sphere::Sphere;

/// Minimum ray parameter accepted as a hit, guarding against self-shadowing.
pub const RAY_EPSILON: f64 = 1e-6;

/// Handle to a non-emitter. Also the surface identity kept on the medium
/// stack for nested transmissive volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThingId(pub usize);

/// Handle to an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightId(pub usize);

/// One geometric part of a non-emitter.
#[derive(Debug, Clone, Copy)]
pub enum Part {
    /// Sphere part.
    Sphere(Sphere),
    /// Infinite plane part.
    Plane(Plane),
}

impl Part {
    /// Smallest ray parameter inside `range` at which the ray strikes this
    /// part, or `None` on a miss.
    pub fn intersect(&self, origin: DVec3, direction: DVec3, range: Interval) -> Option<f64> {
        match self {
            Part::Sphere(sphere) => sphere.intersect(origin, direction, range),
            Part::Plane(plane) => plane.intersect(origin, direction, range),
        }
    }

    /// Unit normal at a point on the part surface.
    pub fn normal_at(&self, point: DVec3) -> DVec3 {
        match self {
            Part::Sphere(sphere) => sphere.normal_at(point),
            Part::Plane(plane) => plane.normal_at(point),
        }
    }
}

/// Non-emissive surface: parts sharing one material.
#[derive(Debug, Clone)]
pub struct Thing {
    /// Geometry of the surface.
    pub parts: Vec<Part>,
    /// Material shared by every part.
    pub material: Material,
    /// Background surfaces are only visible where no foreground surface is.
    pub background: bool,
}

impl Thing {
    /// Foreground surface from parts and a material.
    pub fn new(parts: Vec<Part>, material: Material) -> Self {
        Self {
            parts,
            material,
            background: false,
        }
    }

    /// Background surface, serving as a far environment.
    pub fn background(parts: Vec<Part>, material: Material) -> Self {
        Self {
            parts,
            material,
            background: true,
        }
    }
}

/// Emissive surface: sphere parts sharing one emission.
#[derive(Debug, Clone)]
pub struct Light {
    /// Geometry of the emitter.
    pub parts: Vec<Sphere>,
    /// Radiance emitted uniformly from the surface.
    pub emission: Color,
    /// Background emitters are only visible where no foreground surface is.
    pub background: bool,
}

impl Light {
    /// Foreground emitter from sphere parts and an emission.
    pub fn new(parts: Vec<Sphere>, emission: Color) -> Self {
        Self {
            parts,
            emission,
            background: false,
        }
    }

    /// Background emitter, serving as a far environment.
    pub fn background(parts: Vec<Sphere>, emission: Color) -> Self {
        Self {
            parts,
            emission,
            background: true,
        }
    }
}

/// Constant-colour sky returned for rays that miss every surface.
#[derive(Debug, Clone, Copy)]
pub struct Sky {
    /// Radiance of the sky.
    pub color: Color,
}

/// A renderable scene. Read-only while rays are in flight.
pub struct Scene {
    /// Non-emissive surfaces.
    pub things: Vec<Thing>,
    /// Emissive surfaces.
    pub lights: Vec<Light>,
    /// Sky for rays that miss everything.
    pub sky: Sky,
}

impl Scene {
    /// Create an empty scene under the given sky.
    pub fn new(sky: Sky) -> Self {
        Self {
            things: Vec::new(),
            lights: Vec::new(),
            sky,
        }
    }

    /// Add a non-emitter, returning its handle.
    pub fn add_thing(&mut self, thing: Thing) -> ThingId {
        self.things.push(thing);
        ThingId(self.things.len() - 1)
    }

    /// Add an emitter, returning its handle.
    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.push(light);
        LightId(self.lights.len() - 1)
    }

    /// Resolve a non-emitter handle.
    pub fn thing(&self, id: ThingId) -> &Thing {
        &self.things[id.0]
    }

    /// Resolve an emitter handle.
    pub fn light(&self, id: LightId) -> &Light {
        &self.lights[id.0]
    }

    /// Direct illumination arriving at a surface point with outward normal
    /// `normal`, estimated with one area sample per emitter part.
    ///
    /// Each sample is weighted by both cosines and the emitter area over the
    /// squared distance, with Lambertian 1/pi normalisation, and is discarded
    /// when a foreground non-emitter occludes the shadow ray.
    pub fn direct_light<R: Rng>(&self, point: DVec3, normal: DVec3, rng: &mut R) -> Color {
        let mut total = BLACK;
        for light in &self.lights {
            for part in &light.parts {
                let (sample, light_normal) = part.sample_surface(rng);
                let to_light = sample - point;
                let distance_squared = to_light.length_squared();
                if distance_squared <= RAY_EPSILON {
                    continue;
                }
                let distance = distance_squared.sqrt();
                let direction = to_light / distance;

                let cos_surface = normal.dot(direction);
                let cos_light = light_normal.dot(-direction);
                if cos_surface <= 0.0 || cos_light <= 0.0 {
                    continue;
                }
                if self.occluded(point, direction, distance) {
                    continue;
                }
                let geometry = cos_surface * cos_light * part.area() / (PI * distance_squared);
                total += light.emission * geometry;
            }
        }
        total
    }

    /// Whether any foreground non-emitter blocks the segment from `origin`
    /// towards `direction` before `distance`.
    ///
    /// Background surfaces model a far environment and never occlude, and
    /// emitters do not shadow each other.
    pub fn occluded(&self, origin: DVec3, direction: DVec3, distance: f64) -> bool {
        let range = Interval::new(RAY_EPSILON, distance - RAY_EPSILON);
        self.things
            .iter()
            .filter(|thing| !thing.background)
            .flat_map(|thing| &thing.parts)
            .any(|part| part.intersect(origin, direction, range).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::WHITE;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn lit_scene() -> Scene {
        let mut scene = Scene::new(Sky { color: BLACK });
        scene.add_light(Light::new(
            vec![Sphere::new(DVec3::new(0.0, 5.0, 0.0), 0.5)],
            Color::new(10.0, 10.0, 10.0),
        ));
        scene
    }

    #[test]
    fn unoccluded_point_receives_light() {
        let scene = lit_scene();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        // Single samples can land on the emitter's far hemisphere and
        // contribute nothing, so accumulate a few.
        let mut received = BLACK;
        for _ in 0..64 {
            received += scene.direct_light(DVec3::ZERO, DVec3::Y, &mut rng);
        }
        assert!(received.x > 0.0);
        assert_relative_eq!(received.x, received.y, epsilon = 1e-12);
        assert_relative_eq!(received.x, received.z, epsilon = 1e-12);
    }

    #[test]
    fn light_below_the_horizon_contributes_nothing() {
        let scene = lit_scene();
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        // Surface faces away from the emitter.
        let received = scene.direct_light(DVec3::ZERO, DVec3::NEG_Y, &mut rng);
        assert_eq!(received, BLACK);
    }

    #[test]
    fn blocker_shadows_the_point() {
        let mut scene = lit_scene();
        scene.add_thing(Thing::new(
            vec![Part::Sphere(Sphere::new(DVec3::new(0.0, 2.5, 0.0), 1.5))],
            Material::diffuse(WHITE),
        ));
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let received = scene.direct_light(DVec3::ZERO, DVec3::Y, &mut rng);
        assert_eq!(received, BLACK);
    }

    #[test]
    fn background_surfaces_do_not_occlude() {
        let mut scene = lit_scene();
        scene.add_thing(Thing::background(
            vec![Part::Sphere(Sphere::new(DVec3::new(0.0, 2.5, 0.0), 1.5))],
            Material::diffuse(WHITE),
        ));
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let mut received = BLACK;
        for _ in 0..64 {
            received += scene.direct_light(DVec3::ZERO, DVec3::Y, &mut rng);
        }
        assert!(received.x > 0.0);
    }

    #[test]
    fn occlusion_ignores_surfaces_beyond_the_target() {
        let mut scene = lit_scene();
        scene.add_thing(Thing::new(
            vec![Part::Sphere(Sphere::new(DVec3::new(0.0, 20.0, 0.0), 1.0))],
            Material::diffuse(WHITE),
        ));
        assert!(!scene.occluded(DVec3::ZERO, DVec3::Y, 4.5));
        assert!(scene.occluded(DVec3::ZERO, DVec3::Y, 25.0));
    }
}
