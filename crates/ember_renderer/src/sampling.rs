//! Random sampling and scattering directions.
//!
//! Every function takes its RNG explicitly; the renderer hands each
//! parallel row its own stream from [`pixel_rng`].

use std::collections::hash_map::DefaultHasher;
use std::f32::consts::PI;
use std::hash::{Hash, Hasher};

use ember_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Index of refraction used for every dielectric.
pub const IOR: f32 = 1.5;

/// Uniform float in [0, 1).
#[inline]
pub fn random_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Independent RNG stream for one row of one frame.
pub fn pixel_rng(seed: u64, frame: u64, row: u32) -> StdRng {
    let mut hasher = DefaultHasher::new();
    (seed, frame, row).hash(&mut hasher);
    StdRng::seed_from_u64(hasher.finish())
}

/// Cosine-weighted direction on the hemisphere around unit normal `n`.
pub fn diffuse_reflection(rng: &mut dyn RngCore, n: Vec3) -> Vec3 {
    let r1 = 2.0 * PI * random_f32(rng);
    let r2 = random_f32(rng);
    let r2s = r2.sqrt();

    let (tangent, bitangent) = n.any_orthonormal_pair();
    let direction = tangent * (r1.cos() * r2s) + bitangent * (r1.sin() * r2s) + n * (1.0 - r2).sqrt();
    direction.normalize()
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - 2.0 * d.dot(n) * n
}

/// Refracted direction of `d` through a surface with normal `n`.
///
/// `inside` selects the relative index (leaving vs. entering the medium).
/// The normal may face either way. Past the critical angle the mirror
/// direction is returned.
pub fn refraction(inside: bool, d: Vec3, n: Vec3) -> Vec3 {
    let eta = if inside { IOR } else { 1.0 / IOR };

    // Orient the normal against the incoming direction
    let n = if d.dot(n) < 0.0 { n } else { -n };
    let cos_i = -d.dot(n);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);

    if k < 0.0 {
        return reflect(d, n);
    }
    (eta * d + (eta * cos_i - k.sqrt()) * n).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_f32_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let r = random_f32(&mut rng);
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn test_pixel_rng_streams_differ() {
        let a = pixel_rng(1, 0, 0).next_u64();
        let b = pixel_rng(1, 0, 1).next_u64();
        let c = pixel_rng(1, 1, 0).next_u64();
        let again = pixel_rng(1, 0, 0).next_u64();

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, again);
    }

    #[test]
    fn test_diffuse_reflection_in_hemisphere() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [Vec3::Y, -Vec3::Z, Vec3::new(1.0, 1.0, 0.0).normalize()] {
            for _ in 0..2_000 {
                let r = diffuse_reflection(&mut rng, n);
                assert!((r.length() - 1.0).abs() < 1e-4);
                assert!(r.dot(n) >= -1e-6);
            }
        }
    }

    #[test]
    fn test_diffuse_reflection_is_cosine_weighted() {
        // E[cos] over a cosine-weighted hemisphere is 2/3
        let mut rng = StdRng::seed_from_u64(3);
        let n = Vec3::Z;
        let trials = 50_000;
        let mean: f32 = (0..trials)
            .map(|_| diffuse_reflection(&mut rng, n).dot(n))
            .sum::<f32>()
            / trials as f32;
        assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean cos = {}", mean);
    }

    #[test]
    fn test_reflect() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(d, Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_refraction_normal_incidence_passes_straight() {
        let d = -Vec3::Z;
        let entering = refraction(false, d, Vec3::Z);
        assert!((entering - d).length() < 1e-5);

        // Leaving through the far side, outward normal points along d
        let leaving = refraction(true, d, -Vec3::Z);
        assert!((leaving - d).length() < 1e-5);
    }

    #[test]
    fn test_refraction_bends_toward_normal_when_entering() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = refraction(false, d, Vec3::Y);

        assert!(r.y < 0.0);
        // sin(t) = sin(i) / IOR
        let sin_i = d.x;
        assert!((r.x - sin_i / IOR).abs() < 1e-5);
    }

    #[test]
    fn test_total_internal_reflection_from_inside() {
        // 60 degrees from the normal exceeds the ~41.8 degree critical angle
        let d = Vec3::new(60f32.to_radians().sin(), 60f32.to_radians().cos(), 0.0);
        let outward = Vec3::Y;
        let r = refraction(true, d, outward);

        assert!((r - reflect(d, outward)).length() < 1e-5);
        assert!(r.dot(outward) < 0.0);
    }
}
