//! Recursive path sampling.
//!
//! [`PathTracer::sample`] estimates the radiance arriving along a ray. Each
//! non-emissive hit picks exactly one lobe (refraction, specular or diffuse)
//! with probability given by the material and recurses once.
//!
//! The lobe weight is the material colour alone; it is not divided by the
//! probability of picking that lobe. Images therefore darken materials that
//! split their energy across lobes, and this is kept as-is.

use ember_core::{Material, SceneQuery};
use ember_math::{Color, Ray};
use rand::RngCore;

use crate::sampling::{diffuse_reflection, random_f32, reflect, refraction};

/// Hard cutoff on path length. Paths still bouncing here contribute black.
pub const MAX_DEPTH: u32 = 20;

/// Lobe chosen at a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Refract,
    Reflect,
    Diffuse,
}

impl Branch {
    /// Partition `[0, 1)` as `[0, refr)`, `[refr, refr + refl)`, rest diffuse.
    #[inline]
    pub fn select(material: &Material, r0: f32) -> Self {
        if r0 < material.refraction {
            Branch::Refract
        } else if r0 < material.refraction + material.reflectivity {
            Branch::Reflect
        } else {
            Branch::Diffuse
        }
    }
}

/// Unidirectional path tracer without russian roulette.
#[derive(Debug, Clone, Copy)]
pub struct PathTracer {
    max_depth: u32,
}

impl Default for PathTracer {
    fn default() -> Self {
        Self::new(MAX_DEPTH)
    }
}

impl PathTracer {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Radiance estimate along `ray`, which is `depth` bounces from the camera.
    pub fn sample(
        &self,
        scene: &dyn SceneQuery,
        ray: &Ray,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let Some(hit) = scene.intersect(ray) else {
            // Escaped: skybox
            return scene.sample_environment(ray.direction);
        };

        let point = ray.at(hit.t);
        let material = scene.material(hit.obj_idx, point);
        if material.emissive {
            return material.diffuse;
        }

        if depth >= self.max_depth {
            return Color::ZERO;
        }

        let r0 = random_f32(rng);
        match Branch::select(&material, r0) {
            Branch::Refract => {
                let r = refraction(ray.inside, ray.direction, hit.normal);
                let extension = Ray::offset(point, r).with_inside(hit.normal.dot(r) < 0.0);
                material.diffuse * self.sample(scene, &extension, depth + 1, rng)
            }
            Branch::Reflect => {
                let r = reflect(ray.direction, hit.normal);
                let extension = Ray::offset(point, r);
                material.diffuse * self.sample(scene, &extension, depth + 1, rng)
            }
            Branch::Diffuse => {
                let r = diffuse_reflection(rng, hit.normal);
                let extension = Ray::offset(point, r);
                r.dot(hit.normal) * material.diffuse * self.sample(scene, &extension, depth + 1, rng)
            }
        }
    }
}
