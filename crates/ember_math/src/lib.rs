// Re-export glam for convenience
pub use glam::*;

// ember math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::{Hit, Ray, EPSILON, FAR};

/// RGB radiance. Components are linear and unbounded above.
pub type Color = Vec3;
