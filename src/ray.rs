//! The path-tracing core.
//!
//! A [`Ray`] carries the whole state of one light path: current vertex,
//! direction, accumulated throughput, remaining depth, the stack of
//! transmissive volumes it is inside, and the cached result of the last
//! nearest-intersection query. [`Ray::trace`] drives the path to termination
//! and returns the radiance it picked up.

use glam::DVec3;
use rand::Rng;

use crate::interval::Interval;
use crate::material::{Color, Interaction, BLACK, WHITE};
use crate::random;
use crate::scene::{LightId, Scene, ThingId, RAY_EPSILON};

/// Refractive index of empty space, used when the medium stack is empty.
const VACUUM_INDEX: f64 = 1.0;

/// Nearest surface struck by a ray, cached between bounces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A non-emitter was struck.
    Thing {
        /// The surface.
        thing: ThingId,
        /// Index of the struck part within the surface.
        part: usize,
    },
    /// An emitter was struck; the path terminates on it.
    Light {
        /// The emitter.
        light: LightId,
        /// Index of the struck part within the emitter.
        part: usize,
    },
}

/// LIFO stack of the transmissive volumes currently enclosing a ray.
///
/// The top, if any, is the medium on the outgoing side of the ray at its next
/// interface; an empty stack denotes vacuum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediumStack(Vec<ThingId>);

impl MediumStack {
    /// The enclosing medium, if any.
    pub fn top(&self) -> Option<ThingId> {
        self.0.last().copied()
    }

    /// The medium the ray would re-enter by leaving the top one. Does not
    /// modify the stack.
    pub fn peek_below_top(&self) -> Option<ThingId> {
        self.0.len().checked_sub(2).map(|i| self.0[i])
    }

    /// Enter a medium.
    pub fn push(&mut self, thing: ThingId) {
        self.0.push(thing);
    }

    /// Leave the topmost medium.
    pub fn pop(&mut self) -> Option<ThingId> {
        self.0.pop()
    }

    /// Whether the ray is in vacuum.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of nested media.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// State of one light path from camera to termination.
///
/// Single-producer, single-consumer: a ray belongs to one tracing thread from
/// birth to termination, and borrows the scene for that lifetime.
#[derive(Debug, Clone)]
pub struct Ray {
    /// Current path vertex.
    pub origin: DVec3,
    /// Outgoing unit direction from the origin.
    pub direction: DVec3,
    /// Path throughput, painted at each interaction. Starts white.
    pub color: Color,
    /// Remaining bounces. Reaching 0 forbids further scattering.
    pub depth: i32,
    /// Russian-roulette limit in (0, 1]; smaller values kill fewer paths.
    pub rr_limit: f64,
    /// Transmissive volumes currently enclosing the ray.
    pub inside: MediumStack,
    /// Cached result of the most recent nearest-intersection query.
    pub hit: Option<Hit>,
}

impl Ray {
    /// Create a ray about to take its first intersection query.
    pub fn new(origin: DVec3, direction: DVec3, depth: i32, rr_limit: f64) -> Self {
        Self {
            origin,
            direction,
            color: WHITE,
            depth,
            rr_limit,
            inside: MediumStack::default(),
            hit: None,
        }
    }

    /// Estimate the radiance arriving along this path.
    ///
    /// The caller must have resolved the first hit with
    /// [`Ray::advance_to_next_hit`]. Each loop iteration handles one path
    /// vertex: emitter hits and total misses terminate with the throughput
    /// times the terminal radiance, non-emitter hits paint the throughput by
    /// the surface colour and dispatch on the behaviour the material draws.
    pub fn trace<R: Rng>(&mut self, scene: &Scene, rng: &mut R) -> Color {
        let mut radiance = BLACK;
        loop {
            if self.color == BLACK || self.depth < 0 {
                return radiance;
            }

            let (thing_id, part_index) = match self.hit {
                Some(Hit::Light { light, .. }) => {
                    // Struck a lightsource. The path ends here.
                    self.paint(scene.light(light).emission);
                    return radiance + self.color;
                }
                None => {
                    // Missed every surface. The path ends here.
                    self.paint(scene.sky.color);
                    return radiance + self.color;
                }
                Some(Hit::Thing { thing, part }) => (thing, part),
            };

            let thing = scene.thing(thing_id);
            self.paint(thing.material.color);
            self.depth -= 1;

            // Decide what the surface behaves like this time.
            match thing.material.interact(rng) {
                Interaction::Diffuse => {
                    let normal = thing.parts[part_index].normal_at(self.origin);
                    radiance += self.color * scene.direct_light(self.origin, normal, rng);
                    if self.depth < 1 || self.russian_roulette(rng) {
                        return radiance;
                    }
                    self.direction = random::hemisphere(normal, rng);
                    self.paint(WHITE * self.direction.dot(normal));
                    self.advance_to_next_hit(scene);
                }
                Interaction::Metallic => {
                    let (n1, n2) = self.refraction_indices(scene, thing_id);
                    let normal = thing.parts[part_index].normal_at(self.origin);
                    self.direction -= normal * (2.0 * self.direction.dot(normal));
                    let cos_theta = self.direction.dot(normal);
                    self.paint(WHITE * schlick(n1, n2, cos_theta));
                    if self.depth < 1 || self.russian_roulette(rng) {
                        return radiance;
                    }
                    self.advance_to_next_hit(scene);
                }
                Interaction::Reflect => {
                    if self.depth < 1 || self.russian_roulette(rng) {
                        return radiance;
                    }
                    let normal = thing.parts[part_index].normal_at(self.origin);
                    self.direction -= normal * (2.0 * self.direction.dot(normal));
                    self.advance_to_next_hit(scene);
                }
                Interaction::Refract => {
                    if self.depth < 1 || self.russian_roulette(rng) {
                        return radiance;
                    }
                    let entering = self.inside.top() != Some(thing_id);
                    let (n1, n2) = self.refraction_indices(scene, thing_id);
                    let eta = n1 / n2;
                    let normal = thing.parts[part_index].normal_at(self.origin);
                    let cos_theta1 = self.direction.dot(normal).abs();
                    let sin_theta2_squared = eta * eta * (1.0 - cos_theta1 * cos_theta1);
                    if sin_theta2_squared > 1.0 {
                        // Total internal reflection; the medium stack is untouched.
                        self.direction -= normal * (2.0 * self.direction.dot(normal));
                    } else {
                        // Refractive transmission per Snell's law.
                        let cos_theta2 = (1.0 - sin_theta2_squared).sqrt();
                        let sign = if self.direction.dot(normal) < 0.0 {
                            1.0
                        } else {
                            -1.0
                        };
                        self.direction =
                            self.direction * eta + normal * ((eta * cos_theta1 - cos_theta2) * sign);
                        if entering {
                            self.inside.push(thing_id);
                        } else {
                            self.inside.pop();
                        }
                    }
                    self.advance_to_next_hit(scene);
                }
            }
        }
    }

    /// Resolve the nearest intersection and advance the origin to it.
    ///
    /// Two passes, foreground then background: any foreground hit beats every
    /// background hit regardless of distance. Within a pass the smallest
    /// positive parameter wins, and an emitter displaces a non-emitter at
    /// equal distance. On a total miss the hit slot is cleared and the origin
    /// stays put; the caller treats that as sky.
    pub fn advance_to_next_hit(&mut self, scene: &Scene) {
        debug_assert!(self.depth >= 0);
        self.hit = None;
        let range = Interval::new(RAY_EPSILON, f64::INFINITY);

        for background in [false, true] {
            let mut nearest = f64::INFINITY;

            for (index, thing) in scene.things.iter().enumerate() {
                if thing.background != background {
                    continue;
                }
                for (part_index, part) in thing.parts.iter().enumerate() {
                    if let Some(t) = part.intersect(self.origin, self.direction, range) {
                        if t < nearest {
                            nearest = t;
                            self.hit = Some(Hit::Thing {
                                thing: ThingId(index),
                                part: part_index,
                            });
                        }
                    }
                }
            }

            for (index, light) in scene.lights.iter().enumerate() {
                if light.background != background {
                    continue;
                }
                for (part_index, part) in light.parts.iter().enumerate() {
                    if let Some(t) = part.intersect(self.origin, self.direction, range) {
                        if t <= nearest {
                            nearest = t;
                            self.hit = Some(Hit::Light {
                                light: LightId(index),
                                part: part_index,
                            });
                        }
                    }
                }
            }

            if self.hit.is_some() {
                self.origin += self.direction * nearest;
                return;
            }
        }
    }

    /// Multiply the throughput by a tint.
    fn paint(&mut self, tint: Color) {
        self.color *= tint;
    }

    /// Refractive indices on the incoming and outgoing side of the interface
    /// the ray stands on, consulting the medium stack without modifying it.
    fn refraction_indices(&self, scene: &Scene, thing: ThingId) -> (f64, f64) {
        let index_of = |id: Option<ThingId>| match id {
            None => VACUUM_INDEX,
            Some(id) => scene.thing(id).material.refractive_index,
        };
        let n1 = index_of(self.inside.top());
        let entering = self.inside.top() != Some(thing);
        let n2 = if entering {
            scene.thing(thing).material.refractive_index
        } else {
            index_of(self.inside.peek_below_top())
        };
        (n1, n2)
    }

    /// Stochastic path termination on dim throughput.
    ///
    /// Never kills while the throughput maximum reaches `rr_limit`. Survivors
    /// are compensated by `rr_limit / max` to keep the estimator unbiased.
    fn russian_roulette<R: Rng>(&mut self, rng: &mut R) -> bool {
        let max_color = self.color.max_element();
        if self.rr_limit <= max_color {
            return false;
        }
        if max_color < rng.random::<f64>() * self.rr_limit {
            return true;
        }
        self.color *= self.rr_limit / max_color;
        false
    }
}

/// Schlick's approximation of the Fresnel reflectance at an interface
/// between media with indices `n1` and `n2`, at incidence cosine `cos_theta`.
pub fn schlick(n1: f64, n2: f64, cos_theta: f64) -> f64 {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}
