//! Surface materials and the per-hit behaviour draw.
//!
//! A surface does not commit to a single scattering model. Each hit draws one
//! of four behaviours (diffuse, metallic, ideal reflection, dielectric
//! refraction) from the surface's behaviour weights, and the tracer dispatches
//! on the drawn tag.

use glam::DVec3;
use rand::Rng;

/// RGB colour type. Linear, unbounded non-negative; clamping is the output
/// stage's job.
pub type Color = DVec3;

/// Black, the zero colour and the dead-path throughput.
pub const BLACK: Color = DVec3::ZERO;

/// White, the initial path throughput.
pub const WHITE: Color = DVec3::ONE;

/// Behaviour a surface exhibits for a single interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Lambertian scattering with a direct-light contribution.
    Diffuse,
    /// Fresnel-modulated specular reflection (Schlick approximation).
    Metallic,
    /// Ideal specular mirror.
    Reflect,
    /// Ideal dielectric: refract or totally internally reflect per Snell.
    Refract,
}

/// Surface description: base colour, refractive index and the odds of each
/// behaviour.
///
/// The weights need not sum to one; `interact` draws proportionally.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    /// Base colour painted onto the path throughput at every hit.
    pub color: Color,
    /// Refractive index, consulted by the metallic and refractive branches.
    pub refractive_index: f64,
    weights: [f64; 4],
}

impl Material {
    /// Create a material with explicit behaviour weights, ordered
    /// [diffuse, metallic, reflect, refract]. The weights must be
    /// non-negative and sum to something positive.
    pub fn new(color: Color, refractive_index: f64, weights: [f64; 4]) -> Self {
        assert!(
            weights.iter().all(|&w| w >= 0.0) && weights.iter().sum::<f64>() > 0.0,
            "behaviour weights must be non-negative with a positive sum"
        );
        Self {
            color,
            refractive_index,
            weights,
        }
    }

    /// Purely Lambertian surface.
    pub fn diffuse(color: Color) -> Self {
        Self::new(color, 1.0, [1.0, 0.0, 0.0, 0.0])
    }

    /// Purely metallic surface with the given index of refraction.
    pub fn metallic(color: Color, refractive_index: f64) -> Self {
        Self::new(color, refractive_index, [0.0, 1.0, 0.0, 0.0])
    }

    /// Ideal mirror.
    pub fn mirror() -> Self {
        Self::new(WHITE, 1.0, [0.0, 0.0, 1.0, 0.0])
    }

    /// Clear dielectric (1.5 is typical glass).
    pub fn glass(refractive_index: f64) -> Self {
        Self::new(WHITE, refractive_index, [0.0, 0.0, 0.0, 1.0])
    }

    /// Draw the behaviour for the current interaction.
    pub fn interact<R: Rng>(&self, rng: &mut R) -> Interaction {
        const TAGS: [Interaction; 4] = [
            Interaction::Diffuse,
            Interaction::Metallic,
            Interaction::Reflect,
            Interaction::Refract,
        ];
        let total: f64 = self.weights.iter().sum();
        let mut u = rng.random::<f64>() * total;
        for (tag, &weight) in TAGS.iter().zip(&self.weights) {
            if u < weight {
                return *tag;
            }
            u -= weight;
        }
        // Floating point can leave u a hair past the last non-zero bucket.
        let mut last = Interaction::Diffuse;
        for (tag, &weight) in TAGS.iter().zip(&self.weights) {
            if weight > 0.0 {
                last = *tag;
            }
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn single_weight_materials_always_draw_their_tag() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mirror = Material::mirror();
        let glass = Material::glass(1.5);
        for _ in 0..100 {
            assert_eq!(mirror.interact(&mut rng), Interaction::Reflect);
            assert_eq!(glass.interact(&mut rng), Interaction::Refract);
        }
    }

    #[test]
    fn mixed_weights_draw_roughly_proportionally() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let material = Material::new(WHITE, 1.0, [3.0, 1.0, 0.0, 0.0]);
        let mut diffuse = 0;
        let trials = 10_000;
        for _ in 0..trials {
            if material.interact(&mut rng) == Interaction::Diffuse {
                diffuse += 1;
            }
        }
        let fraction = f64::from(diffuse) / f64::from(trials);
        assert!((fraction - 0.75).abs() < 0.02, "got {fraction}");
    }

    #[test]
    #[should_panic]
    fn zero_weight_sum_is_rejected() {
        let _ = Material::new(WHITE, 1.0, [0.0; 4]);
    }
}
