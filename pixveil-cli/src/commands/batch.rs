//! Batch encode/decode over many images, processed in parallel.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use pixveil_core::{Method, Stego, StegoConfig};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::utils;
use crate::{DecodeMethodArg, MethodArg};

fn encode_one(
    stego: &Stego,
    image: &Path,
    message: &str,
    password: Option<&str>,
    method: Method,
    out_dir: Option<&Path>,
) -> Result<PathBuf> {
    let pixels = utils::load_image(image)?;
    let encoded = stego
        .encode(&pixels, message, password, method)
        .with_context(|| format!("Failed to hide message in {}", image.display()))?;
    let output = match out_dir {
        Some(dir) => utils::derived_path_in(dir, image, "stego"),
        None => utils::derived_path(image, "stego"),
    };
    utils::save_png(encoded, &output)?;
    Ok(output)
}

fn decode_one(
    stego: &Stego,
    image: &Path,
    password: Option<&str>,
    method: Option<Method>,
) -> Result<(Method, String)> {
    let pixels = utils::load_image(image)?;
    match method {
        Some(method) => {
            let message = stego
                .decode(&pixels, password, method)
                .with_context(|| format!("Decoding {}", image.display()))?;
            Ok((method, message))
        }
        None => {
            let report = stego.decode_all(&pixels, password);
            match report.first_found() {
                Some((method, message)) => Ok((method, message.to_owned())),
                None if report.only_undecryptable() => {
                    bail!("Payload in {} could not be decrypted", image.display())
                }
                None => bail!("No hidden message found in {}", image.display()),
            }
        }
    }
}

fn finish(failed: usize, total: usize) -> Result<()> {
    if failed > 0 {
        bail!("{failed} of {total} images failed");
    }
    Ok(())
}

/// Hide the same message in every image.
pub fn encode(
    images: Vec<PathBuf>,
    message: String,
    password: Option<String>,
    method: MethodArg,
    out_dir: Option<PathBuf>,
    config: &StegoConfig,
    quiet: bool,
) -> Result<()> {
    let stego = Stego::new(config.clone());
    let method = Method::from(method);
    debug!(count = images.len(), %method, "Batch encode");

    let results: Vec<_> = images
        .par_iter()
        .map(|image| {
            let result = encode_one(
                &stego,
                image,
                &message,
                password.as_deref(),
                method,
                out_dir.as_deref(),
            );
            (image, result)
        })
        .collect();

    let mut failed = 0;
    for (image, result) in &results {
        match result {
            Ok(output) if quiet => println!("{}", output.display()),
            Ok(output) => println!(
                "{} {} -> {}",
                "ok".green().bold(),
                image.display(),
                output.display()
            ),
            Err(e) => {
                failed += 1;
                warn!(path = %image.display(), error = %e, "Batch item failed");
                eprintln!("{} {}: {e:#}", "failed".red().bold(), image.display());
            }
        }
    }

    finish(failed, results.len())
}

/// Recover messages from every image.
pub fn decode(
    images: Vec<PathBuf>,
    password: Option<String>,
    method: DecodeMethodArg,
    config: &StegoConfig,
    quiet: bool,
) -> Result<()> {
    let stego = Stego::new(config.clone());
    debug!(count = images.len(), "Batch decode");

    let results: Vec<_> = images
        .par_iter()
        .map(|image| {
            let result = decode_one(&stego, image, password.as_deref(), method.single());
            (image, result)
        })
        .collect();

    let mut failed = 0;
    for (image, result) in &results {
        match result {
            Ok((method, message)) if quiet => {
                println!("{}\t{method}\t{}", image.display(), utils::preview(message, 60))
            }
            Ok((method, message)) => println!(
                "{} {} [{}] {}",
                "found".green().bold(),
                image.display(),
                method,
                utils::preview(message, 60)
            ),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {e:#}", "none".yellow().bold(), image.display());
            }
        }
    }

    finish(failed, results.len())
}
