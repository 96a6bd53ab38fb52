//! Encode command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use pixveil_core::{Method, Stego, StegoConfig};
use tracing::{debug, info};

use crate::utils;
use crate::EncodeArgs;

/// Execute the encode command.
pub fn execute(args: EncodeArgs, config: &StegoConfig, quiet: bool) -> Result<()> {
    let EncodeArgs {
        image,
        message,
        password,
        method,
        watermark,
        output,
        dry_run,
    } = args;
    let method = Method::from(method);
    let stego = Stego::new(config.clone());

    let mut pixels = utils::load_image(&image)?;
    let capacity = stego.capacity(pixels.width(), pixels.height(), method);

    if let Some(text) = watermark.as_deref() {
        pixels = stego
            .embed_watermark(&pixels, text)
            .context("Failed to apply watermark")?;
        debug!(text, "Watermark applied");
    }

    let encoded = stego
        .encode(&pixels, &message, password.as_deref(), method)
        .with_context(|| format!("Failed to hide message in {}", image.display()))?;
    let output = output.unwrap_or_else(|| utils::derived_path(&image, "stego"));

    if dry_run {
        info!(%method, capacity, "Dry run, nothing written");
        if !quiet {
            println!("{}", "Dry run: message fits".green().bold());
            println!("   {} {}", "Method:".dimmed(), method);
            println!(
                "   {} {} / {} bytes",
                "Message:".dimmed(),
                message.len(),
                capacity
            );
            println!("   {} {}", "Would write:".dimmed(), output.display());
        }
        return Ok(());
    }

    utils::save_png(encoded, &output)?;
    info!(path = %output.display(), %method, "Stego image saved");

    if quiet {
        println!("{}", output.display());
    } else {
        println!();
        println!("{}", "Message hidden".green().bold());
        println!();
        println!("   {} {}", "Output:".dimmed(), output.display());
        println!("   {} {}", "Method:".dimmed(), method);
        println!(
            "   {} {}",
            "Encrypted:".dimmed(),
            if password.as_deref().is_some_and(|p| !p.is_empty()) {
                "yes".green()
            } else {
                "no".yellow()
            }
        );
        println!(
            "   {} {} of {} bytes",
            "Capacity used:".dimmed(),
            message.len(),
            capacity
        );
        if watermark.is_some() {
            println!("   {} applied", "Watermark:".dimmed());
        }
    }

    Ok(())
}
