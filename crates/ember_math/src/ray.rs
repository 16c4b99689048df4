use crate::Vec3;

/// Initial "nothing hit yet" distance for fresh rays.
pub const FAR: f32 = 1e34;

/// Offset applied to continuation rays so they do not re-hit the surface
/// they start on.
pub const EPSILON: f32 = 1e-4;

/// A ray in 3D space.
///
/// `t_max` bounds the search for the nearest hit, `inside` records whether the
/// ray travels through the interior of a dielectric.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t_max: f32,
    pub inside: bool,
}

impl Ray {
    /// Create a new ray starting outside any medium.
    pub fn new(origin: Vec3, direction: Vec3, t_max: f32) -> Self {
        Self {
            origin,
            direction,
            t_max,
            inside: false,
        }
    }

    /// Continuation ray leaving `point` along `direction`.
    ///
    /// The origin is pushed `EPSILON` along the new direction.
    pub fn offset(point: Vec3, direction: Vec3) -> Self {
        Self::new(point + direction * EPSILON, direction, FAR)
    }

    /// Mark the ray as travelling inside (or outside) a dielectric.
    pub fn with_inside(mut self, inside: bool) -> Self {
        self.inside = inside;
        self
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest intersection found along a ray.
///
/// `normal` is the outward geometric normal of the primitive (unit length),
/// independent of which side the ray arrived from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hit {
    pub t: f32,
    pub normal: Vec3,
    pub obj_idx: usize,
}

impl Hit {
    pub fn new(t: f32, normal: Vec3, obj_idx: usize) -> Self {
        Self { t, normal, obj_idx }
    }
}
