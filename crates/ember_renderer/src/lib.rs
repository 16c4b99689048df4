//! ember renderer - CPU progressive path tracing.
//!
//! A Monte Carlo path tracer that refines the image one sample per pixel
//! per frame. The host owns the scene and calls [`FrameDriver::tick`] until
//! it returns [`FrameStatus::Finished`] or the user quits.

mod accumulator;
mod camera;
mod integrator;
mod renderer;
mod sampling;

pub use accumulator::Accumulator;
pub use camera::Camera;
pub use integrator::{Branch, PathTracer, MAX_DEPTH};
pub use renderer::{
    color_to_rgb, linear_to_gamma, rgb_bytes, FrameDriver, FrameStatus, RenderConfig,
    RenderReport, RunningTime,
};
pub use sampling::{diffuse_reflection, pixel_rng, reflect, refraction, IOR};

/// Re-export common math types from ember_math
pub use ember_math::{Color, Ray, Vec3};
