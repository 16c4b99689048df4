//! Headless host for the ember path tracer.
//!
//! Usage: `ember_runner [settings.json] [scene.json]`
//!
//! Without a scene file the built-in Cornell-style sphere scene is used.
//! Limited runs stop when the time budget is spent; unbounded runs keep
//! refining until `max_frames` (or forever), rewriting the output image
//! every `snapshot_every` frames.

use anyhow::{Context, Result};
use ember_core::{RenderSettings, SceneDescription, World};
use ember_renderer::{rgb_bytes, FrameDriver, FrameStatus};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let settings_path = args.next();
    let scene_path = args.next();

    let settings = match &settings_path {
        Some(path) => RenderSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => {
            log::info!("No settings file given, using defaults");
            RenderSettings::default()
        }
    };

    let world = match &scene_path {
        Some(path) => load_world(path)?,
        None => {
            log::info!("No scene file given, using the built-in sphere scene");
            World::cornell_spheres()
        }
    };
    log::info!("Scene has {} objects", world.len());

    let mut driver =
        FrameDriver::from_settings(&settings).context("Invalid render settings")?;

    if !settings.writes_output() {
        log::warn!(
            "Unbounded run with no snapshot_every or max_frames: {} is never written",
            settings.output.display()
        );
    }
    let mut frames = 0u32;

    let report = loop {
        match driver.tick(&world) {
            FrameStatus::Finished(report) => break Some(report),
            FrameStatus::Rendering { spp } => {
                frames += 1;
                let snapshot_due = settings.snapshot_every > 0 && frames % settings.snapshot_every == 0;
                if settings.running_time_secs.is_none() && snapshot_due {
                    save_png(&settings.output, driver.width(), driver.height(), driver.pixels())?;
                    log::info!("Snapshot at {} spp ({:?})", spp, driver.elapsed());
                }
                if settings.max_frames.is_some_and(|max| frames >= max) {
                    log::info!("Reached {} frames, stopping", frames);
                    break None;
                }
            }
        }
    };

    save_png(&settings.output, driver.width(), driver.height(), driver.pixels())?;
    log::info!("Saved {}", settings.output.display());

    // Report line
    match report {
        Some(report) => println!(
            "elapsed_ms={} spp={}",
            report.elapsed_ms, report.samples_per_pixel
        ),
        None => println!(
            "elapsed_ms={} spp={}",
            driver.elapsed().as_millis(),
            driver.spp()
        ),
    }

    Ok(())
}

/// Load a scene description, resolving skydome paths next to the file.
fn load_world(path: &Path) -> Result<World> {
    let description = SceneDescription::load(path)
        .with_context(|| format!("Failed to load scene from {}", path.display()))?;
    let world = description
        .into_world(path.parent())
        .with_context(|| format!("Invalid scene {}", path.display()))?;
    Ok(world)
}

/// Write the packed display buffer as an 8-bit RGB PNG.
fn save_png(path: &Path, width: u32, height: u32, pixels: &[u32]) -> Result<()> {
    let mut img = image::RgbImage::new(width, height);
    for (dst, &src) in img.pixels_mut().zip(pixels) {
        *dst = image::Rgb(rgb_bytes(src));
    }
    img.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}
