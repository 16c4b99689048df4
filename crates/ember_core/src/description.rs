//! JSON scene and render settings files.
//!
//! Both formats are plain serde structs; every field has a default so
//! partial files are accepted.

use std::path::{Path, PathBuf};

use ember_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::environment::{Environment, Skydome};
use crate::primitive::{Object, Plane, Primitive};
use crate::scene::{SceneError, SceneResult, World};

/// Environment as written in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvironmentDesc {
    Constant { color: Color },
    Gradient { horizon: Color, zenith: Color },
    /// Lat-long image, resolved relative to the scene file.
    Skydome {
        path: PathBuf,
        #[serde(default = "default_skydome_scale")]
        scale: f32,
    },
}

fn default_skydome_scale() -> f32 {
    1.0
}

impl Default for EnvironmentDesc {
    fn default() -> Self {
        EnvironmentDesc::Constant { color: Color::ZERO }
    }
}

/// A scene file: objects plus environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub objects: Vec<Object>,
    pub environment: EnvironmentDesc,
}

impl SceneDescription {
    /// Parse a description from JSON text.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a description from a JSON file.
    pub fn load(path: &Path) -> SceneResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validate and build the world.
    ///
    /// Relative skydome paths are resolved against `base_dir` when given.
    pub fn into_world(self, base_dir: Option<&Path>) -> SceneResult<World> {
        let environment = match self.environment {
            EnvironmentDesc::Constant { color } => Environment::Constant(color),
            EnvironmentDesc::Gradient { horizon, zenith } => {
                Environment::Gradient { horizon, zenith }
            }
            EnvironmentDesc::Skydome { path, scale } => {
                let full_path = resolve_path(&path, base_dir);
                Environment::Skydome(Skydome::load(&full_path, scale)?)
            }
        };

        let mut world = World::new(environment);
        for (i, object) in self.objects.into_iter().enumerate() {
            let shape = validate_shape(i, object.shape)?;
            world.add(shape, object.surface);
        }

        log::info!("Built scene with {} objects", world.len());
        Ok(world)
    }
}

/// Reject degenerate shapes and normalize plane normals.
fn validate_shape(index: usize, shape: Primitive) -> SceneResult<Primitive> {
    match shape {
        Primitive::Sphere(sphere) => {
            if !(sphere.radius > 0.0) {
                return Err(SceneError::InvalidDescription(format!(
                    "object {}: sphere radius must be positive, got {}",
                    index, sphere.radius
                )));
            }
            Ok(shape)
        }
        Primitive::Plane(plane) => {
            if plane.normal.length_squared() == 0.0 || !plane.normal.is_finite() {
                return Err(SceneError::InvalidDescription(format!(
                    "object {}: plane normal must be a non-zero vector",
                    index
                )));
            }
            Ok(Primitive::Plane(Plane::new(plane.normal, plane.distance)))
        }
    }
}

fn resolve_path(path: &Path, base_dir: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else if let Some(base) = base_dir {
        base.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Render settings file.
///
/// `running_time_secs = None` renders until stopped; `use_gpu` and
/// `gpu_platform` select the compute offload backend, which this build
/// does not ship, so they only affect logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub running_time_secs: Option<u64>,
    pub use_gpu: bool,
    pub gpu_platform: usize,
    /// Fixed seed for reproducible frames; random per run when absent
    pub seed: Option<u64>,
    pub look_from: Vec3,
    pub look_at: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub output: PathBuf,
    /// Write an intermediate image every N frames (unbounded runs only, 0 = never)
    pub snapshot_every: u32,
    /// Stop an unbounded headless run after this many frames
    pub max_frames: Option<u32>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            running_time_secs: None,
            use_gpu: true,
            gpu_platform: 0,
            seed: None,
            look_from: Vec3::new(0.0, 0.5, 4.0),
            look_at: Vec3::new(0.0, 0.0, -3.0),
            vfov: 50.0,
            output: PathBuf::from("render.png"),
            snapshot_every: 0,
            max_frames: None,
        }
    }
}

impl RenderSettings {
    /// Parse settings from JSON text.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> SceneResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Whether a headless run ever writes `output`: limited runs and runs
    /// capped by `max_frames` end with a final image, unbounded runs only
    /// through snapshots.
    pub fn writes_output(&self) -> bool {
        self.running_time_secs.is_some() || self.max_frames.is_some() || self.snapshot_every > 0
    }

    pub fn validate(&self) -> SceneResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidDescription(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.look_from == self.look_at {
            return Err(SceneError::InvalidDescription(
                "camera look_from and look_at coincide".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::primitive::{Sphere, Surface};
    use crate::scene::SceneQuery;

    #[test]
    fn test_settings_defaults_from_empty_json() {
        let settings = RenderSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, RenderSettings::default());
        assert!(settings.running_time_secs.is_none());
        assert!(settings.use_gpu);
        assert_eq!(settings.gpu_platform, 0);
    }

    #[test]
    fn test_settings_partial_override() {
        let settings =
            RenderSettings::from_json_str(r#"{ "width": 32, "running_time_secs": 5, "seed": 7 }"#)
                .unwrap();
        assert_eq!(settings.width, 32);
        assert_eq!(settings.height, 480);
        assert_eq!(settings.running_time_secs, Some(5));
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn test_unbounded_default_never_writes_output() {
        let settings = RenderSettings::default();
        assert!(!settings.writes_output());

        let snapshots = RenderSettings {
            snapshot_every: 16,
            ..RenderSettings::default()
        };
        assert!(snapshots.writes_output());

        let capped = RenderSettings {
            max_frames: Some(64),
            ..RenderSettings::default()
        };
        assert!(capped.writes_output());

        let limited = RenderSettings {
            running_time_secs: Some(5),
            ..RenderSettings::default()
        };
        assert!(limited.writes_output());
    }

    #[test]
    fn test_settings_reject_zero_resolution() {
        let err = RenderSettings::from_json_str(r#"{ "width": 0 }"#).unwrap_err();
        assert!(matches!(err, SceneError::InvalidDescription(_)));
    }

    #[test]
    fn test_scene_round_trip_through_world() {
        let json = r#"{
            "environment": { "type": "constant", "color": [0.1, 0.2, 0.3] },
            "objects": [
                {
                    "shape": { "type": "plane", "normal": [0.0, 3.0, 0.0], "distance": 1.0 },
                    "surface": { "type": "solid", "diffuse": [0.8, 0.8, 0.8] }
                },
                {
                    "shape": { "type": "sphere", "center": [0.0, 0.0, -3.0], "radius": 1.0 },
                    "surface": { "type": "solid", "diffuse": [4.0, 4.0, 4.0], "emissive": true }
                }
            ]
        }"#;

        let world = SceneDescription::from_json_str(json)
            .unwrap()
            .into_world(None)
            .unwrap();

        assert_eq!(world.len(), 2);
        // Plane normal was normalized
        match world.objects()[0].shape {
            Primitive::Plane(plane) => assert_eq!(plane.normal, Vec3::Y),
            _ => panic!("expected plane"),
        }
        assert!(world.material(1, Vec3::ZERO).emissive);
        assert_eq!(world.sample_environment(Vec3::X), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_degenerate_shapes_rejected() {
        let bad_sphere = SceneDescription {
            objects: vec![Object::new(
                Primitive::Sphere(Sphere::new(Vec3::ZERO, 0.0)),
                Surface::Solid(Material::default()),
            )],
            environment: EnvironmentDesc::default(),
        };
        assert!(bad_sphere.into_world(None).is_err());

        let bad_plane = SceneDescription {
            objects: vec![Object::new(
                Primitive::Plane(Plane {
                    normal: Vec3::ZERO,
                    distance: 1.0,
                }),
                Surface::Solid(Material::default()),
            )],
            environment: EnvironmentDesc::default(),
        };
        assert!(bad_plane.into_world(None).is_err());
    }

    #[test]
    fn test_missing_skydome_is_an_error() {
        let desc = SceneDescription {
            objects: Vec::new(),
            environment: EnvironmentDesc::Skydome {
                path: PathBuf::from("does/not/exist.hdr"),
                scale: 1.0,
            },
        };
        assert!(desc.into_world(Some(Path::new("/nonexistent"))).is_err());
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/scenes");
        assert_eq!(
            resolve_path(Path::new("sky.hdr"), Some(base)),
            PathBuf::from("/scenes/sky.hdr")
        );
        assert_eq!(
            resolve_path(Path::new("/abs/sky.hdr"), Some(base)),
            PathBuf::from("/abs/sky.hdr")
        );
        assert_eq!(resolve_path(Path::new("sky.hdr"), None), PathBuf::from("sky.hdr"));
    }
}
