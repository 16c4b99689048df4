//! Radiance arriving from outside the scene.
//!
//! Rays that escape every primitive read their radiance from an
//! [`Environment`]: a constant colour, a vertical gradient, or a lat-long
//! skydome image.

use std::f32::consts::PI;
use std::path::Path;

use ember_math::{Color, Vec3};
use image::DynamicImage;

use crate::scene::{SceneError, SceneResult};

/// Environment radiance as a function of direction.
#[derive(Debug, Clone)]
pub enum Environment {
    Constant(Color),
    Gradient { horizon: Color, zenith: Color },
    Skydome(Skydome),
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Constant(Color::ZERO)
    }
}

impl Environment {
    /// Radiance seen along `direction`.
    pub fn sample(&self, direction: Vec3) -> Color {
        match self {
            Environment::Constant(color) => *color,
            Environment::Gradient { horizon, zenith } => {
                let unit_direction = direction.normalize_or_zero();
                let a = 0.5 * (unit_direction.y + 1.0);
                *horizon * (1.0 - a) + *zenith * a
            }
            Environment::Skydome(dome) => dome.sample(direction),
        }
    }
}

/// Lat-long radiance map in linear RGB.
#[derive(Clone, Debug)]
pub struct Skydome {
    width: u32,
    height: u32,
    texels: Vec<Color>,
    scale: f32,
}

impl Skydome {
    /// Build a skydome from row-major texels (top row = straight up).
    pub fn from_texels(width: u32, height: u32, texels: Vec<Color>) -> SceneResult<Self> {
        if width == 0 || height == 0 || texels.len() != width as usize * height as usize {
            return Err(SceneError::InvalidDescription(format!(
                "skydome needs {}x{} texels, got {}",
                width,
                height,
                texels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            texels,
            scale: 1.0,
        })
    }

    /// Load a skydome image. HDR sources are kept linear, 8-bit sources are
    /// decoded from sRGB.
    pub fn load(path: &Path, scale: f32) -> SceneResult<Self> {
        let img = image::open(path)?;
        let (width, height) = (img.width(), img.height());

        let texels: Vec<Color> = match &img {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => img
                .to_rgb32f()
                .pixels()
                .map(|p| Color::new(p[0], p[1], p[2]))
                .collect(),
            _ => img
                .to_rgb8()
                .pixels()
                .map(|p| {
                    Color::new(
                        srgb_to_linear(p[0]),
                        srgb_to_linear(p[1]),
                        srgb_to_linear(p[2]),
                    )
                })
                .collect(),
        };

        log::info!(
            "Loaded skydome: {} ({}x{}, scale {})",
            path.display(),
            width,
            height,
            scale
        );

        Ok(Self::from_texels(width, height, texels)?.with_scale(scale))
    }

    /// Multiply every lookup by `scale`.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Nearest-texel lookup for `direction` (need not be normalized).
    pub fn sample(&self, direction: Vec3) -> Color {
        let d = direction.normalize_or_zero();
        let u = 0.5 * (1.0 + d.x.atan2(-d.z) / PI);
        let v = d.y.clamp(-1.0, 1.0).acos() / PI;

        // `as` saturates, so NaN lands on texel 0 instead of panicking
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        self.texels[y as usize * self.width as usize + x as usize] * self.scale
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
