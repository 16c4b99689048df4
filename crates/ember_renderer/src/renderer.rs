//! Progressive frame driver.
//!
//! Each [`FrameDriver::tick`] adds exactly one path sample to every pixel:
//! - rows are traced in parallel with rayon, each with its own RNG stream
//! - samples are summed into the [`Accumulator`]
//! - the display buffer is rewritten from the running mean
//!
//! The accumulator is cleared when the camera moves (unbounded runs only) or
//! on an explicit [`FrameDriver::reset`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use ember_core::{RenderSettings, SceneError, SceneQuery, SceneResult};
use ember_math::{Color, Interval, Vec3};
use rayon::prelude::*;

use crate::accumulator::Accumulator;
use crate::camera::Camera;
use crate::integrator::{PathTracer, MAX_DEPTH};
use crate::sampling::pixel_rng;

/// How long the driver keeps producing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningTime {
    /// Until the host stops calling `tick`. Camera moves restart accumulation.
    Unbounded,
    /// Stop and report once this much wall-clock time has passed.
    Limited(Duration),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub running_time: RunningTime,
    /// Compute offload request; only logged, the CPU integrator always runs
    pub use_gpu: bool,
    pub gpu_platform: usize,
    /// Base seed for the per-row RNG streams; random when `None`
    pub seed: Option<u64>,
    /// Maximum ray bounce depth
    pub max_depth: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            running_time: RunningTime::Unbounded,
            use_gpu: true,
            gpu_platform: 0,
            seed: None,
            max_depth: MAX_DEPTH,
        }
    }
}

impl RenderConfig {
    pub fn from_settings(settings: &RenderSettings) -> Self {
        let running_time = match settings.running_time_secs {
            Some(secs) => RunningTime::Limited(Duration::from_secs(secs)),
            None => RunningTime::Unbounded,
        };
        Self {
            running_time,
            use_gpu: settings.use_gpu,
            gpu_platform: settings.gpu_platform,
            seed: settings.seed,
            ..Self::default()
        }
    }
}

/// Final statistics handed to the host when the time budget runs out.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub elapsed_ms: u64,
    pub samples_per_pixel: u32,
    pub width: u32,
    pub height: u32,
    /// Packed `0x00RRGGBB`, row-major
    pub pixels: Vec<u32>,
}

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameStatus {
    /// A frame was added; `spp` samples per pixel so far.
    Rendering { spp: u32 },
    /// The time budget is spent. Every later tick returns the same report.
    Finished(RenderReport),
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear colour to a packed `0x00RRGGBB` display value.
pub fn color_to_rgb(color: Color) -> u32 {
    let channel = |c: f32| (255.0 * Interval::UNIT.clamp(linear_to_gamma(c))) as u32;
    (channel(color.x) << 16) | (channel(color.y) << 8) | channel(color.z)
}

/// Split a packed display value into `[r, g, b]` bytes.
#[inline]
pub fn rgb_bytes(pixel: u32) -> [u8; 3] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}

/// Drives progressive accumulation one frame at a time.
pub struct FrameDriver {
    config: RenderConfig,
    tracer: PathTracer,
    camera: Camera,
    accumulator: Accumulator,
    pixels: Vec<u32>,
    seed: u64,
    frames: u64,
    timer: Option<Instant>,
    report: Option<RenderReport>,
    non_finite_reported: AtomicBool,
}

impl FrameDriver {
    /// Create a driver for `camera`'s resolution.
    ///
    /// Fails on an empty image.
    pub fn new(mut camera: Camera, config: RenderConfig) -> SceneResult<Self> {
        let (width, height) = (camera.image_width, camera.image_height);
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidDescription(format!(
                "resolution must be non-zero, got {}x{}",
                width, height
            )));
        }
        camera.initialize();

        if config.use_gpu {
            log::warn!(
                "GPU offload requested (platform {}), but no compute backend is available; using the CPU integrator",
                config.gpu_platform
            );
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!(
            "Frame driver: {}x{}, max depth {}, {:?}, seed {}",
            width,
            height,
            config.max_depth,
            config.running_time,
            seed
        );

        Ok(Self {
            tracer: PathTracer::new(config.max_depth),
            config,
            camera,
            accumulator: Accumulator::new(width, height),
            pixels: vec![0; width as usize * height as usize],
            seed,
            frames: 0,
            timer: None,
            report: None,
            non_finite_reported: AtomicBool::new(false),
        })
    }

    /// Build camera and config from a settings file.
    pub fn from_settings(settings: &RenderSettings) -> SceneResult<Self> {
        settings.validate()?;
        let camera = Camera::new()
            .with_resolution(settings.width, settings.height)
            .with_position(settings.look_from, settings.look_at, Vec3::Y)
            .with_vfov(settings.vfov);
        Self::new(camera, RenderConfig::from_settings(settings))
    }

    /// Render one frame: one more sample for every pixel.
    pub fn tick(&mut self, scene: &dyn SceneQuery) -> FrameStatus {
        if let Some(report) = &self.report {
            return FrameStatus::Finished(report.clone());
        }

        let start = *self.timer.get_or_insert_with(Instant::now);

        // Interactive runs restart accumulation when the camera moves
        if self.config.running_time == RunningTime::Unbounded && self.camera.take_moved() {
            log::debug!("Camera moved after {} spp; clearing accumulator", self.accumulator.spp());
            self.accumulator.clear();
        }

        let scale = self.accumulator.begin_pass();
        let frame = self.frames;
        self.frames += 1;

        let width = self.accumulator.width() as usize;
        let seed = self.seed;
        let camera = &self.camera;
        let tracer = &self.tracer;
        let non_finite_reported = &self.non_finite_reported;

        self.accumulator
            .sums_mut()
            .par_chunks_mut(width)
            .zip(self.pixels.par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, (sums, pixels))| {
                let mut rng = pixel_rng(seed, frame, y as u32);
                for (x, (sum, pixel)) in sums.iter_mut().zip(pixels.iter_mut()).enumerate() {
                    // generate primary ray
                    let ray = camera.primary_ray(x as u32, y as u32, &mut rng);
                    // trace path
                    let radiance = tracer.sample(scene, &ray, 0, &mut rng);
                    if !Accumulator::accumulate(sum, radiance)
                        && !non_finite_reported.swap(true, Ordering::Relaxed)
                    {
                        log::warn!("Dropped non-finite sample at pixel ({}, {})", x, y);
                    }
                    // plot final color
                    *pixel = color_to_rgb(scale * *sum);
                }
            });

        let spp = self.accumulator.spp();
        log::debug!("Frame {} done, {} spp", frame, spp);

        if let RunningTime::Limited(budget) = self.config.running_time {
            let elapsed = start.elapsed();
            if elapsed >= budget {
                let report = RenderReport {
                    elapsed_ms: elapsed.as_millis() as u64,
                    samples_per_pixel: spp,
                    width: self.accumulator.width(),
                    height: self.accumulator.height(),
                    pixels: self.pixels.clone(),
                };
                log::info!(
                    "Render finished: {} ms, {} spp",
                    report.elapsed_ms,
                    report.samples_per_pixel
                );
                self.report = Some(report.clone());
                return FrameStatus::Finished(report);
            }
        }

        FrameStatus::Rendering { spp }
    }

    /// Clear the accumulator; the next tick starts again from one sample.
    pub fn reset(&mut self) {
        self.accumulator.clear();
    }

    /// Report produced when a limited run finished.
    pub fn report(&self) -> Option<&RenderReport> {
        self.report.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.report.is_some()
    }

    pub fn spp(&self) -> u32 {
        self.accumulator.spp()
    }

    /// Time since the first tick.
    pub fn elapsed(&self) -> Duration {
        self.timer.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn width(&self) -> u32 {
        self.accumulator.width()
    }

    pub fn height(&self) -> u32 {
        self.accumulator.height()
    }

    /// Display buffer, packed `0x00RRGGBB`, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera access for the host's input handling.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}
