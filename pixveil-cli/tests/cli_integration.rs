//! CLI integration tests for pixveil-cli.
//!
//! These tests run the actual binary and check outputs, exit codes and the
//! written image files.

use assert_cmd::Command;
use image::{Rgba, RgbaImage};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a Command for the pixveil binary.
fn pixveil() -> Command {
    let mut cmd = Command::cargo_bin("pixveil").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write a textured PNG cover image.
fn write_cover(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width) as u8,
            (60 + (y * 120 / height)) as u8,
            (40 + ((x + y) % 150)) as u8,
            255,
        ])
    });
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_displays_usage() {
    pixveil()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Image steganography"))
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("batch-encode"));
}

#[test]
fn test_version_displays_version() {
    pixveil()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pixveil"));
}

#[test]
fn test_help_shows_exit_codes() {
    pixveil()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exit codes:"))
        .stdout(predicate::str::contains("65"))
        .stdout(predicate::str::contains("66"));
}

#[test]
fn test_encode_help_shows_options() {
    pixveil()
        .args(["encode", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--message"))
        .stdout(predicate::str::contains("--password"))
        .stdout(predicate::str::contains("--method"))
        .stdout(predicate::str::contains("--watermark"))
        .stdout(predicate::str::contains("--dry-run"));
}

// ============================================================================
// Encode / Decode
// ============================================================================

#[test]
fn test_encode_then_decode_lsb() {
    let dir = TempDir::new().unwrap();
    let cover = write_cover(dir.path(), "cover.png", 64, 64);
    let out = dir.path().join("out.png");

    pixveil()
        .args(["encode", cover.to_str().unwrap(), "-m", "hello cli", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Message hidden"));
    assert!(out.exists());

    pixveil()
        .args(["-q", "decode"])
        .arg(&out)
        .args(["--method", "lsb"])
        .assert()
        .success()
        .stdout("hello cli\n");
}

#[test]
fn test_default_output_path() {
    let dir = TempDir::new().unwrap();
    let cover = write_cover(dir.path(), "photo.png", 32, 32);

    pixveil()
        .args(["-q", "encode"])
        .arg(&cover)
        .args(["-m", "x"])
        .assert()
        .success();
    assert!(dir.path().join("photo_stego.png").exists());
}

#[test]
fn test_encrypted_roundtrip_and_wrong_password() {
    let dir = TempDir::new().unwrap();
    let cover = write_cover(dir.path(), "cover.png", 128, 128);
    let out = dir.path().join("secret.png");

    pixveil()
        .args(["encode"])
        .arg(&cover)
        .args(["-m", "classified", "-p", "swordfish", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("yes"));

    pixveil()
        .args(["-q", "decode"])
        .arg(&out)
        .args(["-p", "swordfish"])
        .assert()
        .success()
        .stdout("classified\n");

    pixveil()
        .args(["decode"])
        .arg(&out)
        .args(["-p", "guess"])
        .assert()
        .code(65)
        .stderr(predicate::str::contains("could not be decrypted"));
}

#[test]
fn test_decode_all_json() {
    let dir = TempDir::new().unwrap();
    let cover = write_cover(dir.path(), "cover.png", 256, 256);
    let out = dir.path().join("dct.png");

    pixveil()
        .args(["-q", "encode"])
        .arg(&cover)
        .args(["-m", "freq", "--method", "dct", "-o"])
        .arg(&out)
        .assert()
        .success();

    let output = pixveil()
        .args(["decode", "--json"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["dct"]["status"], "found");
    assert_eq!(report["dct"]["message"], "freq");
}

#[test]
fn test_decode_clean_image_is_data_error() {
    let dir = TempDir::new().unwrap();
    let cover = write_cover(dir.path(), "clean.png", 64, 64);

    pixveil()
        .args(["decode"])
        .arg(&cover)
        .assert()
        .code(65)
        .stderr(predicate::str::contains("No hidden message"));
}

#[test]
fn test_message_too_large_is_data_error() {
    let dir = TempDir::new().unwrap();
    let cover = write_cover(dir.path(), "tiny.png", 8, 8);
    let long = "z".repeat(100);

    pixveil()
        .args(["encode"])
        .arg(&cover)
        .args(["-m", &long])
        .assert()
        .code(65)
        .stderr(predicate::str::contains("too large"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let cover = write_cover(dir.path(), "cover.png", 32, 32);
    let out = dir.path().join("never.png");

    pixveil()
        .args(["encode", "--dry-run"])
        .arg(&cover)
        .args(["-m", "hi", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));
    assert!(!out.exists());
}

#[test]
fn test_missing_input_is_no_input() {
    pixveil()
        .args(["decode", "/nonexistent/image.png"])
        .assert()
        .code(66)
        .stderr(predicate::str::contains("Failed to read image"));
}

#[test]
fn test_empty_message_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let cover = write_cover(dir.path(), "cover.png", 32, 32);

    pixveil()
        .args(["encode"])
        .arg(&cover)
        .args(["-m", ""])
        .assert()
        .code(64);
}

// ============================================================================
// Analyze / Watermark / Capacity
// ============================================================================

#[test]
fn test_analyze_json_and_noise_map() {
    let dir = TempDir::new().unwrap();
    let cover = write_cover(dir.path(), "cover.png", 48, 48);
    let map = dir.path().join("noise.png");

    let output = pixveil()
        .args(["analyze", "--json", "--noise-map"])
        .arg(&map)
        .arg(&cover)
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(result["entropy"].as_f64().is_some());
    assert_eq!(result["ones"].as_u64().unwrap() + result["zeros"].as_u64().unwrap(), 48 * 48);

    let noise = image::open(&map).unwrap().to_rgba8();
    assert!(noise.pixels().all(|p| p.0 == [0, 0, 0, 255] || p.0 == [255, 255, 255, 255]));
}

#[test]
fn test_watermark_and_reveal() {
    let dir = TempDir::new().unwrap();
    let cover = write_cover(dir.path(), "cover.png", 160, 120);
    let marked = dir.path().join("marked.png");
    let revealed = dir.path().join("revealed.png");

    pixveil()
        .args(["watermark"])
        .arg(&cover)
        .args(["-t", "PIXVEIL", "-o"])
        .arg(&marked)
        .assert()
        .success();

    pixveil()
        .args(["reveal"])
        .arg(&marked)
        .args(["-o"])
        .arg(&revealed)
        .assert()
        .success();

    let img = image::open(&revealed).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (160, 120));
    assert!(img.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
}

#[test]
fn test_capacity_by_size() {
    pixveil()
        .args(["-q", "capacity", "--size", "100x100", "--method", "lsb"])
        .assert()
        .success()
        .stdout("lsb 3743\n");

    pixveil()
        .args(["capacity", "--size", "512x512"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dct"))
        .stdout(predicate::str::contains("99"))
        .stdout(predicate::str::contains("505"));
}

#[test]
fn test_capacity_bad_size_is_usage_error() {
    pixveil()
        .args(["capacity", "--size", "big"])
        .assert()
        .code(64);
}

#[test]
fn test_config_file_changes_capacity() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("pixveil.json");
    std::fs::write(&config, r#"{ "dct": { "repetition": 1 } }"#).unwrap();

    pixveil()
        .args(["-q", "--config"])
        .arg(&config)
        .args(["capacity", "--size", "64x64", "--method", "dct"])
        .assert()
        .success()
        .stdout("dct 5\n");
}

// ============================================================================
// Batch
// ============================================================================

#[test]
fn test_batch_encode_decode() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("out");
    let covers: Vec<_> = (0..3)
        .map(|i| write_cover(dir.path(), &format!("c{i}.png"), 40, 40))
        .collect();

    pixveil()
        .arg("batch-encode")
        .args(&covers)
        .args(["-m", "batch!", "--out-dir"])
        .arg(&out_dir)
        .assert()
        .success();

    let outputs: Vec<_> = (0..3).map(|i| out_dir.join(format!("c{i}_stego.png"))).collect();
    assert!(outputs.iter().all(|p| p.exists()));

    pixveil()
        .arg("batch-decode")
        .args(&outputs)
        .assert()
        .success()
        .stdout(predicate::str::contains("batch!").count(3));
}

#[test]
fn test_batch_decode_reports_failures() {
    let dir = TempDir::new().unwrap();
    let clean = write_cover(dir.path(), "clean.png", 32, 32);

    pixveil()
        .arg("batch-decode")
        .arg(&clean)
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 1 images failed"));
}

#[test]
fn test_unknown_method_is_usage_error() {
    pixveil()
        .args(["encode", "x.png", "-m", "hi", "--method", "jpeg"])
        .assert()
        .code(64);
}

#[test]
fn test_env_override_without_config_file() {
    pixveil()
        .env("PIXVEIL_DCT_REPETITION", "1")
        .args(["-q", "capacity", "--size", "64x64", "--method", "dct"])
        .assert()
        .success()
        .stdout("dct 5\n");
}
