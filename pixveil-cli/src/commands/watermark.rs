//! Watermark and reveal command implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use pixveil_core::{Stego, StegoConfig};
use tracing::info;

use crate::utils;

/// Stamp `text` and save the result as PNG.
pub fn embed(
    image: PathBuf,
    text: String,
    output: Option<PathBuf>,
    config: &StegoConfig,
    quiet: bool,
) -> Result<()> {
    let pixels = utils::load_image(&image)?;
    let marked = Stego::new(config.clone())
        .embed_watermark(&pixels, &text)
        .context("Failed to apply watermark")?;

    let output = output.unwrap_or_else(|| utils::derived_path(&image, "watermarked"));
    utils::save_png(marked, &output)?;
    info!(path = %output.display(), "Watermarked image saved");

    if quiet {
        println!("{}", output.display());
    } else {
        println!("{}", "Watermark applied".green().bold());
        println!("   {} {}", "Output:".dimmed(), output.display());
    }
    Ok(())
}

/// Render the blue-channel difference so a watermark becomes visible.
pub fn reveal(
    image: PathBuf,
    output: Option<PathBuf>,
    config: &StegoConfig,
    quiet: bool,
) -> Result<()> {
    let pixels = utils::load_image(&image)?;
    let revealed = Stego::new(config.clone()).reveal_watermark(&pixels);

    let output = output.unwrap_or_else(|| utils::derived_path(&image, "revealed"));
    utils::save_png(revealed, &output)?;
    info!(path = %output.display(), "Revealed image saved");

    if quiet {
        println!("{}", output.display());
    } else {
        println!("{}", "Watermark layer rendered".green().bold());
        println!("   {} {}", "Output:".dimmed(), output.display());
    }
    Ok(())
}
