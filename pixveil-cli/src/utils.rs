//! Common utility functions shared across CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::ImageFormat;
use pixveil_core::{PixelBuffer, StegoConfig};
use tracing::{debug, info};

/// Load any supported image into an RGBA pixel buffer.
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path)
        .with_context(|| format!("Failed to read image: {}", path.display()))?;
    let pixels = PixelBuffer::from(&image);
    info!(
        path = %path.display(),
        width = pixels.width(),
        height = pixels.height(),
        "Read image"
    );
    Ok(pixels)
}

/// Save as PNG. Lossy formats would destroy the payload, so the extension of
/// `path` is ignored.
pub fn save_png(pixels: PixelBuffer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to write directory: {}", parent.display()))?;
    }
    pixels
        .into_rgba_image()
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write image: {}", path.display()))?;
    debug!(path = %path.display(), "Saved PNG");
    Ok(())
}

/// Build the default output path: `dir/photo.jpg` becomes `dir/photo_<suffix>.png`.
pub fn derived_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    input.with_file_name(format!("{stem}_{suffix}.png"))
}

/// Same as [`derived_path`] but placed in `dir`.
pub fn derived_path_in(dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let name = derived_path(input, suffix);
    dir.join(name.file_name().unwrap_or(name.as_os_str()))
}

/// Parse `WIDTHxHEIGHT`, e.g. `1920x1080`.
pub fn parse_size(size: &str) -> Result<(u32, u32)> {
    let Some((w, h)) = size.trim().split_once(['x', 'X']) else {
        bail!("Invalid size '{size}': expected WIDTHxHEIGHT");
    };
    let width: u32 = w
        .trim()
        .parse()
        .with_context(|| format!("Invalid size '{size}': bad width"))?;
    let height: u32 = h
        .trim()
        .parse()
        .with_context(|| format!("Invalid size '{size}': bad height"))?;
    if width == 0 || height == 0 {
        bail!("Invalid size '{size}': dimensions must be non-zero");
    }
    Ok((width, height))
}

/// Engine settings: JSON file (if given), then `PIXVEIL_*` environment
/// overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<StegoConfig> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            StegoConfig::from_json(&json)
                .with_context(|| format!("Invalid config: {}", path.display()))?
                .with_env_overrides()
        }
        None => StegoConfig::from_env(),
    };
    config.validate().context("Invalid config")?;
    debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Shorten long messages for one-line summaries.
pub fn preview(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_owned();
    }
    let mut short: String = message.chars().take(max_chars).collect();
    short.push('…');
    short
}
