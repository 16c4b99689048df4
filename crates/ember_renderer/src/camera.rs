//! Pinhole camera for primary ray generation.

use ember_math::{Ray, Vec3, FAR};
use rand::RngCore;

use crate::sampling::random_f32;

/// Camera for generating rays into the scene.
///
/// Moving the camera through [`Camera::set_pose`] raises a flag that the
/// frame driver polls with [`Camera::take_moved`].
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    vfov: f32, // Vertical field of view in degrees

    moved: bool,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            moved: false,
            // Cached values (initialized to defaults)
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            w: Vec3::Z,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set vertical field of view in degrees.
    pub fn with_vfov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        // Calculate viewport dimensions at unit distance
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(self.w).normalize();
        let v = self.w.cross(u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left = self.center - self.w - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
    }

    /// Move the camera. Flags the move for the frame driver.
    pub fn set_pose(&mut self, look_from: Vec3, look_at: Vec3) {
        self.look_from = look_from;
        self.look_at = look_at;
        self.initialize();
        self.moved = true;
    }

    pub fn look_from(&self) -> Vec3 {
        self.look_from
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Whether the pose changed since the last call. Clears the flag.
    pub fn take_moved(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    /// Generate a unit-direction ray through a random point of pixel (i, j).
    pub fn primary_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset_x = random_f32(rng) - 0.5;
        let offset_y = random_f32(rng) - 0.5;

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset_x) * self.pixel_delta_u
            + ((j as f32) + offset_y) * self.pixel_delta_v;

        let ray_direction = (pixel_sample - self.center).normalize();
        Ray::new(self.center, ray_direction, FAR)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(0.0, 1.0, 0.0),
            )
            .with_vfov(90.0);

        camera.initialize();

        assert_eq!(camera.center, Vec3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 0.001);
    }

    #[test]
    fn test_camera_ray_direction() {
        let mut camera = Camera::new()
            .with_resolution(100, 100)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_vfov(90.0);

        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point roughly towards -Z
        let ray = camera.primary_ray(50, 50, &mut rng);
        assert!(ray.direction.z < -0.99);
        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
        assert_eq!(ray.t_max, FAR);
        assert!(!ray.inside);
    }

    #[test]
    fn test_corner_rays_stay_in_frustum() {
        let mut camera = Camera::new()
            .with_resolution(64, 32)
            .with_position(Vec3::ZERO, -Vec3::Z, Vec3::Y)
            .with_vfov(90.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            // Top-left pixel looks up and to the left
            let ray = camera.primary_ray(0, 0, &mut rng);
            assert!(ray.direction.x < 0.0);
            assert!(ray.direction.y > 0.0);

            // Bottom-right looks down and to the right
            let ray = camera.primary_ray(63, 31, &mut rng);
            assert!(ray.direction.x > 0.0);
            assert!(ray.direction.y < 0.0);
        }
    }

    #[test]
    fn test_set_pose_raises_moved_once() {
        let mut camera = Camera::new().with_resolution(10, 10);
        camera.initialize();
        assert!(!camera.take_moved());

        camera.set_pose(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        assert!(camera.take_moved());
        assert!(!camera.take_moved());

        assert_eq!(camera.look_from(), Vec3::new(0.0, 0.0, 5.0));
        assert!((camera.w - Vec3::Z).length() < 0.001);
    }
}
