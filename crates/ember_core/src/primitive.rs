//! Geometric primitives and the surfaces attached to them.

use ember_math::{Interval, Ray, Vec3};
use serde::{Deserialize, Serialize};

use crate::material::Material;

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Nearest root inside `range`, with the outward normal there.
    pub fn hit(&self, ray: &Ray, range: Interval) -> Option<(f32, Vec3)> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !range.surrounds(root) {
            root = (h + sqrtd) / a;
            if !range.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some((root, outward_normal))
    }
}

/// An infinite plane `dot(normal, p) + distance = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal; also the outward side of the plane
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Create a plane, normalizing `normal`.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            distance,
        }
    }

    pub fn hit(&self, ray: &Ray, range: Interval) -> Option<(f32, Vec3)> {
        let denom = self.normal.dot(ray.direction);
        if denom == 0.0 {
            return None;
        }

        let t = -(self.normal.dot(ray.origin) + self.distance) / denom;
        if !range.surrounds(t) {
            return None;
        }
        Some((t, self.normal))
    }
}

/// Shape of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Sphere(Sphere),
    Plane(Plane),
}

impl Primitive {
    pub fn hit(&self, ray: &Ray, range: Interval) -> Option<(f32, Vec3)> {
        match self {
            Primitive::Sphere(sphere) => sphere.hit(ray, range),
            Primitive::Plane(plane) => plane.hit(ray, range),
        }
    }
}

/// How the material varies over an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Surface {
    Solid(Material),
    /// Alternating cells over the xz plane, `scale` cells per unit.
    Checker { a: Material, b: Material, scale: f32 },
}

impl Surface {
    /// Material at world-space point `p`.
    pub fn material_at(&self, p: Vec3) -> Material {
        match *self {
            Surface::Solid(material) => material,
            Surface::Checker { a, b, scale } => {
                let cell = (p.x * scale).floor() as i64 + (p.z * scale).floor() as i64;
                if cell.rem_euclid(2) == 0 {
                    a
                } else {
                    b
                }
            }
        }
    }

    /// Every material this surface can produce.
    pub fn materials(&self) -> Vec<Material> {
        match *self {
            Surface::Solid(material) => vec![material],
            Surface::Checker { a, b, .. } => vec![a, b],
        }
    }
}

/// A primitive paired with its surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub shape: Primitive,
    pub surface: Surface,
}

impl Object {
    pub fn new(shape: Primitive, surface: Surface) -> Self {
        Self { shape, surface }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::{Color, FAR};

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), FAR);

        let (t, normal) = sphere.hit(&ray, Interval::hit_range(ray.t_max)).unwrap();
        assert!((t - 0.5).abs() < 0.001); // Should hit at t=0.5
        assert!((normal - Vec3::Z).length() < 0.001);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), FAR);
        assert!(sphere.hit(&ray, Interval::hit_range(ray.t_max)).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside_keeps_outward_normal() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, FAR);

        let (t, normal) = sphere.hit(&ray, Interval::hit_range(ray.t_max)).unwrap();
        assert!((t - 1.0).abs() < 0.001);
        // Outward, i.e. same side as the ray direction
        assert!(normal.dot(ray.direction) > 0.0);
    }

    #[test]
    fn test_sphere_respects_t_max() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 5.0);
        assert!(sphere.hit(&ray, Interval::hit_range(ray.t_max)).is_none());
    }

    #[test]
    fn test_plane_hit() {
        let floor = Plane::new(Vec3::new(0.0, 2.0, 0.0), 1.0); // y = -1
        let ray = Ray::new(Vec3::ZERO, -Vec3::Y, FAR);

        let (t, normal) = floor.hit(&ray, Interval::hit_range(ray.t_max)).unwrap();
        assert!((t - 1.0).abs() < 0.001);
        assert_eq!(normal, Vec3::Y);
    }

    #[test]
    fn test_plane_parallel_and_behind() {
        let floor = Plane::new(Vec3::Y, 1.0);

        let parallel = Ray::new(Vec3::ZERO, Vec3::X, FAR);
        assert!(floor.hit(&parallel, Interval::hit_range(FAR)).is_none());

        let away = Ray::new(Vec3::ZERO, Vec3::Y, FAR);
        assert!(floor.hit(&away, Interval::hit_range(FAR)).is_none());
    }

    #[test]
    fn test_checker_alternates() {
        let a = Material::diffuse(Color::ONE);
        let b = Material::diffuse(Color::ZERO);
        let surface = Surface::Checker { a, b, scale: 1.0 };

        assert_eq!(surface.material_at(Vec3::new(0.5, 0.0, 0.5)), a);
        assert_eq!(surface.material_at(Vec3::new(1.5, 0.0, 0.5)), b);
        assert_eq!(surface.material_at(Vec3::new(-0.5, 0.0, 0.5)), b);
        assert_eq!(surface.material_at(Vec3::new(-0.5, 0.0, -0.5)), a);
        // Height does not matter
        assert_eq!(surface.material_at(Vec3::new(0.5, -0.0001, 0.5)), a);
    }

    #[test]
    fn test_primitive_json_tagging() {
        let json = r#"{ "type": "sphere", "center": [0.0, 1.0, 0.0], "radius": 2.0 }"#;
        let prim: Primitive = serde_json::from_str(json).unwrap();
        assert_eq!(prim, Primitive::Sphere(Sphere::new(Vec3::Y, 2.0)));
    }
}
