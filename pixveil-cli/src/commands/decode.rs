//! Decode command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use pixveil_core::{crypto, DecodeReport, MethodOutcome, Stego, StegoConfig};
use serde_json::json;
use tracing::{info, warn};

use crate::utils;
use crate::DecodeMethodArg;

/// Execute the decode command.
pub fn execute(
    image: PathBuf,
    password: Option<String>,
    method: DecodeMethodArg,
    json: bool,
    config: &StegoConfig,
    quiet: bool,
) -> Result<()> {
    let pixels = utils::load_image(&image)?;
    let stego = Stego::new(config.clone());

    if let Some(method) = method.single() {
        let message = stego
            .decode(&pixels, password.as_deref(), method)
            .with_context(|| format!("Decoding {} with {method}", image.display()))?;
        info!(%method, bytes = message.len(), "Message recovered");

        if json {
            println!("{}", json!({ "method": method, "message": message }));
        } else if quiet {
            println!("{message}");
        } else {
            print_found(method.name(), &message, false);
        }
        return Ok(());
    }

    let report = stego.decode_all(&pixels, password.as_deref());
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else if quiet {
        if let Some((_, message)) = report.first_found() {
            println!("{message}");
        }
    } else {
        print_report(&report, password.is_some());
    }

    if report.first_found().is_some() {
        Ok(())
    } else if report.only_undecryptable() {
        warn!("Payload present but the password did not open it");
        bail!("A hidden payload was found but could not be decrypted (wrong password?)")
    } else {
        bail!("No hidden message found in {}", image.display())
    }
}

fn print_found(label: &str, message: &str, decrypted: bool) {
    println!();
    println!(
        "{} {}",
        format!("[{label}]").cyan().bold(),
        if decrypted { "decrypted".green() } else { "plain".normal() }
    );
    println!("{message}");
    if !decrypted && crypto::looks_like_envelope(message) {
        println!(
            "{}",
            "   (looks encrypted: pass --password to open it)".yellow()
        );
    }
}

fn print_report(report: &DecodeReport, password_given: bool) {
    let mut shown: Vec<&str> = Vec::new();
    for (method, outcome) in report.iter() {
        match outcome {
            MethodOutcome::Found { message, decrypted } => {
                // same payload under several methods
                if shown.contains(&message.as_str()) {
                    continue;
                }
                print_found(method.name(), message, *decrypted);
                shown.push(message.as_str());
            }
            MethodOutcome::Undecryptable { .. } => {
                println!();
                println!(
                    "{} {}",
                    format!("[{}]", method.name()).cyan().bold(),
                    "payload found, password did not open it".red()
                );
            }
            MethodOutcome::NotFound => {}
        }
    }

    if report.first_found().is_none() && !report.only_undecryptable() {
        println!("{}", "No hidden message found".yellow());
        if !password_given {
            println!("   {}", "If the message was encrypted, pass --password".dimmed());
        }
    }
}
