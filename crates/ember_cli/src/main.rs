use anyhow::{Context, Result};
use clap::Parser;
use ember_renderer::{Camera, CameraSettings, RenderOptions, Renderer};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufWriter};
use std::path::Path;

mod cli;
mod logger;
mod scenes;

use cli::Args;
use logger::init_logger;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    info!("Building scene {:?}", args.scene);
    let mut scene_rng = StdRng::seed_from_u64(args.seed);
    let scene = scenes::build(args.scene, &mut scene_rng);

    let settings = resolve_settings(scene.settings, &args)?;
    let camera = Camera::new(&settings).context("Invalid camera settings")?;

    let options = RenderOptions {
        threads: args.threads,
        seed: args.seed,
    };
    let image = Renderer::new(options)
        .render(&camera, &scene.world)
        .context("Render failed")?;

    match &args.output {
        Some(path) => image
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut out = BufWriter::new(io::stdout().lock());
            image.write_ppm(&mut out).context("Failed to write PPM to stdout")?;
        }
    }

    Ok(())
}

/// Layer the settings file and explicit flags over the scene's camera.
fn resolve_settings(scene: CameraSettings, args: &Args) -> Result<CameraSettings> {
    let mut settings = match &args.settings {
        Some(path) => apply_settings_file(scene, path)?,
        None => scene,
    };

    if let Some(width) = args.width {
        settings.image_width = width;
    }
    if let Some(samples) = args.samples {
        settings.samples_per_pixel = samples;
    }
    if let Some(depth) = args.max_depth {
        settings.max_depth = depth;
    }

    Ok(settings)
}

/// Override only the fields present in a JSON settings file.
fn apply_settings_file(base: CameraSettings, path: &Path) -> Result<CameraSettings> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let overrides: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;

    merge_settings(base, overrides).with_context(|| format!("Invalid settings in {}", path.display()))
}

fn merge_settings(base: CameraSettings, overrides: serde_json::Value) -> Result<CameraSettings> {
    let serde_json::Value::Object(overrides) = overrides else {
        anyhow::bail!("settings must be a JSON object");
    };

    let mut merged = serde_json::to_value(base)?;
    if let serde_json::Value::Object(fields) = &mut merged {
        for (key, value) in overrides {
            if !fields.contains_key(&key) {
                anyhow::bail!("unknown camera setting `{key}`");
            }
            fields.insert(key, value);
        }
    }

    Ok(serde_json::from_value(merged)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_renderer::{Color, Vec3};
    use serde_json::json;

    fn scene_settings() -> CameraSettings {
        CameraSettings::default()
            .with_resolution(600, 1.0)
            .with_quality(50, 50)
            .with_background(Color::ZERO)
    }

    #[test]
    fn test_file_overrides_only_named_fields() {
        let merged = merge_settings(
            scene_settings(),
            json!({ "samples_per_pixel": 3, "look_from": [1.0, 2.0, 3.0] }),
        )
        .unwrap();

        assert_eq!(merged.samples_per_pixel, 3);
        assert_eq!(merged.look_from, Vec3::new(1.0, 2.0, 3.0));
        // Untouched fields keep the scene's values, not the defaults
        assert_eq!(merged.image_width, 600);
        assert_eq!(merged.background, Color::ZERO);
    }

    #[test]
    fn test_unknown_setting_is_rejected() {
        assert!(merge_settings(scene_settings(), json!({ "samples": 3 })).is_err());
        assert!(merge_settings(scene_settings(), json!([1, 2])).is_err());
    }

    #[test]
    fn test_flags_win_over_scene() {
        let args = Args::parse_from(["ember", "--width", "32", "--max-depth", "4"]);
        let settings = resolve_settings(scene_settings(), &args).unwrap();

        assert_eq!(settings.image_width, 32);
        assert_eq!(settings.max_depth, 4);
        assert_eq!(settings.samples_per_pixel, 50);
    }

    #[test]
    fn test_settings_file_then_flags() {
        let path = std::env::temp_dir().join(format!("ember_settings_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "image_width": 80, "max_depth": 7 }"#).unwrap();

        let args = Args::parse_from(["ember", "--settings", path.to_str().unwrap(), "--width", "20"]);
        let settings = resolve_settings(scene_settings(), &args).unwrap();

        assert_eq!(settings.image_width, 20);
        assert_eq!(settings.max_depth, 7);

        std::fs::remove_file(&path).ok();
    }
}
