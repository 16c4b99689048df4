//! Material records looked up at hit points.
//!
//! A material splits incoming paths into three lobes by probability:
//! refraction, then specular reflection, then diffuse with whatever is left.

use ember_math::Color;
use serde::{Deserialize, Serialize};

/// Surface description consumed by the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Albedo, transmission tint, or emitted radiance when `emissive`
    pub diffuse: Color,
    /// Probability of a pure specular bounce
    pub reflectivity: f32,
    /// Probability of a dielectric (refract or total internal reflection) bounce
    pub refraction: f32,
    /// Light source; terminates paths
    pub emissive: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Color::new(0.5, 0.5, 0.5), // Grey default
            reflectivity: 0.0,
            refraction: 0.0,
            emissive: false,
        }
    }
}

impl Material {
    /// Absorbs everything. Returned for lookups that do not resolve.
    pub const BLACK: Material = Material {
        diffuse: Color::ZERO,
        reflectivity: 0.0,
        refraction: 0.0,
        emissive: false,
    };

    /// Purely diffuse surface.
    pub fn diffuse(albedo: Color) -> Self {
        Self {
            diffuse: albedo,
            ..Self::BLACK
        }
    }

    /// Diffuse surface with a specular fraction.
    pub fn mirror(tint: Color, reflectivity: f32) -> Self {
        Self {
            diffuse: tint,
            reflectivity,
            ..Self::BLACK
        }
    }

    /// Dielectric surface with a transmission fraction.
    pub fn glass(tint: Color, refraction: f32) -> Self {
        Self {
            diffuse: tint,
            refraction,
            ..Self::BLACK
        }
    }

    /// Emitter with the given radiance.
    pub fn light(radiance: Color) -> Self {
        Self {
            diffuse: radiance,
            emissive: true,
            ..Self::BLACK
        }
    }

    /// Probability left over for the diffuse lobe.
    pub fn diffuse_probability(&self) -> f32 {
        1.0 - self.refraction - self.reflectivity
    }

    /// Lobe probabilities are non-negative and sum to at most one.
    pub fn is_valid(&self) -> bool {
        self.reflectivity >= 0.0 && self.refraction >= 0.0 && self.diffuse_probability() >= 0.0
    }
}
