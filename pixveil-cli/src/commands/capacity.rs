//! Capacity command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use pixveil_core::{Method, Stego, StegoConfig};

use crate::utils;
use crate::MethodArg;

/// Execute the capacity command.
pub fn execute(
    image: Option<PathBuf>,
    size: Option<String>,
    method: Option<MethodArg>,
    config: &StegoConfig,
    quiet: bool,
) -> Result<()> {
    let (width, height) = match (image, size) {
        (_, Some(size)) => utils::parse_size(&size)?,
        // only the header is read
        (Some(image), None) => image::image_dimensions(&image)
            .with_context(|| format!("Failed to read image: {}", image.display()))?,
        (None, None) => bail!("Invalid size: pass an IMAGE or --size WxH"),
    };

    let stego = Stego::new(config.clone());
    let methods: Vec<Method> = match method {
        Some(m) => vec![m.into()],
        None => Method::ALL.to_vec(),
    };

    if !quiet {
        println!("{} {}x{}", "Image:".dimmed(), width, height);
    }
    for method in methods {
        let bytes = stego.capacity(width, height, method);
        if quiet {
            println!("{method} {bytes}");
        } else {
            let label = format!("{:<9}", format!("{method}:"));
            println!("   {} {} characters", label.cyan(), bytes);
        }
    }
    Ok(())
}
