//! Sampling helpers for the tracer.
//!
//! Every function takes an explicit RNG handle so renders are deterministic
//! for a fixed seed and parallel workers never contend. Pixel RNGs are
//! ChaCha20 streams derived from the user seed and the pixel index.

use std::f64::consts::PI;

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Random unit vector over the hemisphere around `normal`.
///
/// Rejection-samples the unit half-ball in a tangent frame aligned to the
/// normal and projects onto the surface. Samples never point below the
/// hemisphere plane.
pub fn hemisphere<R: Rng>(normal: DVec3, rng: &mut R) -> DVec3 {
    let (x, y, z) = loop {
        let x = rng.random::<f64>() * 2.0 - 1.0;
        let y = rng.random::<f64>() * 2.0 - 1.0;
        let z = rng.random::<f64>();
        let length_squared = x * x + y * y + z * z;
        if length_squared <= 1.0 && length_squared > 0.0 {
            break (x, y, z);
        }
    };

    let (tangent_x, tangent_y) = if normal == DVec3::Z || normal == DVec3::NEG_Z {
        (DVec3::X, DVec3::Y)
    } else {
        let tangent_x = normal.cross(DVec3::Z).normalize();
        let tangent_y = normal.cross(tangent_x).normalize();
        (tangent_x, tangent_y)
    };
    (tangent_x * x + tangent_y * y + normal * z).normalize()
}

/// Random unit vector uniformly distributed on the unit sphere.
pub fn uniform_sphere<R: Rng>(rng: &mut R) -> DVec3 {
    let theta = 2.0 * PI * rng.random::<f64>();
    let cos_phi = 2.0 * rng.random::<f64>() - 1.0;
    let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
    DVec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), cos_phi)
}

/// Random point inside the unit disk (z = 0), by rejection.
pub fn in_unit_disk<R: Rng>(rng: &mut R) -> DVec3 {
    loop {
        let p = DVec3::new(
            rng.random::<f64>() * 2.0 - 1.0,
            rng.random::<f64>() * 2.0 - 1.0,
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// RNG for one pixel, derived from the render seed and the pixel index.
///
/// Mixing the index with a splitmix64-style odd constant decorrelates
/// neighbouring pixels while keeping every stream reproducible.
pub fn pixel_rng(seed: u64, pixel_index: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(
        seed ^ (pixel_index.wrapping_add(1)).wrapping_mul(0x9E37_79B9_7F4A_7C15),
    )
}
