//! Analyze command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use pixveil_core::{Stego, StegoConfig};
use tracing::info;

use crate::utils;

/// Execute the analyze command.
pub fn execute(
    image: PathBuf,
    noise_map: Option<PathBuf>,
    json: bool,
    config: &StegoConfig,
    quiet: bool,
) -> Result<()> {
    let pixels = utils::load_image(&image)?;
    let result = Stego::new(config.clone()).analyze(&pixels);
    info!(
        entropy = result.entropy,
        suspicious = result.suspicious,
        "Analysis complete"
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize analysis")?
        );
    } else if quiet {
        println!("{:.4} {}", result.entropy, result.suspicious);
    } else {
        println!();
        if result.suspicious {
            println!("{}", "SUSPICIOUS: LSB plane looks random".red().bold());
        } else {
            println!("{}", "Likely clean".green().bold());
        }
        println!();
        println!(
            "   {} {:.4} (threshold {:.2})",
            "Entropy:".dimmed(),
            result.entropy,
            result.threshold
        );
        println!(
            "   {} {} ones / {} zeros ({:.1}% ones)",
            "Blue LSBs:".dimmed(),
            result.ones,
            result.zeros,
            result.ones_ratio() * 100.0
        );
    }

    if let Some(path) = noise_map {
        utils::save_png(result.noise_map, &path)?;
        if !quiet && !json {
            println!("   {} {}", "Noise map:".dimmed(), path.display());
        }
    }

    Ok(())
}
