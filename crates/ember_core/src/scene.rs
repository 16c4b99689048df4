//! Scene queries used by the integrator.
//!
//! The renderer only ever sees a scene through [`SceneQuery`]: nearest-hit
//! intersection, material lookup at a hit point, and environment radiance.
//! [`World`] is the concrete, read-only implementation.

use ember_math::{Color, Hit, Interval, Ray, Vec3};
use thiserror::Error;

use crate::environment::Environment;
use crate::material::Material;
use crate::primitive::{Object, Plane, Primitive, Sphere, Surface};

/// Errors that can occur while building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid scene description: {0}")]
    InvalidDescription(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Read-only scene interface.
///
/// Implementations must be safe to query from many render threads at once.
pub trait SceneQuery: Send + Sync {
    /// Nearest hit with `t` in `(0, ray.t_max)`, or `None` on a miss.
    fn intersect(&self, ray: &Ray) -> Option<Hit>;

    /// Material of object `obj_idx` at world-space `point`.
    fn material(&self, obj_idx: usize, point: Vec3) -> Material;

    /// Radiance arriving from `direction` when nothing is hit.
    fn sample_environment(&self, direction: Vec3) -> Color;
}

/// A flat list of objects plus an environment.
pub struct World {
    objects: Vec<Object>,
    environment: Environment,
}

impl World {
    /// Create an empty world.
    pub fn new(environment: Environment) -> Self {
        Self {
            objects: Vec::new(),
            environment,
        }
    }

    /// Add an object and return its index.
    ///
    /// Materials whose lobe probabilities do not partition `[0, 1]` are kept
    /// as-is, but logged.
    pub fn add(&mut self, shape: Primitive, surface: Surface) -> usize {
        for material in surface.materials() {
            if !material.is_valid() {
                log::warn!(
                    "Object {} has reflectivity {} + refraction {} outside [0, 1]; diffuse lobe is starved",
                    self.objects.len(),
                    material.reflectivity,
                    material.refraction
                );
            }
        }
        self.objects.push(Object::new(shape, surface));
        self.objects.len() - 1
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the world is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The built-in scene: a checkered floor and back wall, a diffuse, a
    /// mirror and a glass sphere, lit by one spherical light under a sky
    /// gradient.
    pub fn cornell_spheres() -> Self {
        let mut world = World::new(Environment::Gradient {
            horizon: Color::new(0.6, 0.65, 0.7),
            zenith: Color::new(0.15, 0.25, 0.5),
        });

        // Floor at y = -1
        world.add(
            Primitive::Plane(Plane::new(Vec3::Y, 1.0)),
            Surface::Checker {
                a: Material::diffuse(Color::splat(0.8)),
                b: Material::diffuse(Color::splat(0.3)),
                scale: 1.0,
            },
        );
        // Back wall at z = -6
        world.add(
            Primitive::Plane(Plane::new(Vec3::Z, 6.0)),
            Surface::Solid(Material::diffuse(Color::new(0.7, 0.7, 0.6))),
        );
        world.add(
            Primitive::Sphere(Sphere::new(Vec3::new(-2.2, 0.0, -3.0), 1.0)),
            Surface::Solid(Material::diffuse(Color::new(0.8, 0.2, 0.2))),
        );
        world.add(
            Primitive::Sphere(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0)),
            Surface::Solid(Material::mirror(Color::splat(0.95), 0.9)),
        );
        world.add(
            Primitive::Sphere(Sphere::new(Vec3::new(2.2, 0.0, -3.0), 1.0)),
            Surface::Solid(Material::glass(Color::new(0.9, 1.0, 0.95), 0.95)),
        );
        // Light
        world.add(
            Primitive::Sphere(Sphere::new(Vec3::new(0.0, 4.0, -3.0), 1.0)),
            Surface::Solid(Material::light(Color::new(8.0, 8.0, 7.0))),
        );

        world
    }
}

impl SceneQuery for World {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        let mut closest_so_far = ray.t_max;

        for (obj_idx, object) in self.objects.iter().enumerate() {
            if let Some((t, normal)) = object.shape.hit(ray, Interval::hit_range(closest_so_far)) {
                closest_so_far = t;
                closest = Some(Hit::new(t, normal, obj_idx));
            }
        }

        closest
    }

    fn material(&self, obj_idx: usize, point: Vec3) -> Material {
        match self.objects.get(obj_idx) {
            Some(object) => object.surface.material_at(point),
            None => {
                log::debug!("Material lookup for unknown object {}", obj_idx);
                Material::BLACK
            }
        }
    }

    fn sample_environment(&self, direction: Vec3) -> Color {
        self.environment.sample(direction)
    }
}
