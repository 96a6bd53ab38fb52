#![no_main]

//! Fuzz target for decoding arbitrary RGBA data with every method.
//!
//! The first two bytes pick the width; the rest is pixel data. Decoding and
//! analysis must never panic, whatever the pixels contain.
//!
//! Run with: cargo +nightly fuzz run fuzz_decode

use libfuzzer_sys::fuzz_target;
use pixveil_core::{analyze, decode_all, PixelBuffer};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let width = u16::from_le_bytes([data[0], data[1]]) as u32 % 64 + 1;
    let rgba = &data[2..];
    let height = (rgba.len() / 4) as u32 / width;
    if height == 0 {
        return;
    }
    let used = (width * height * 4) as usize;

    if let Ok(pixels) = PixelBuffer::from_rgba(width, height, &rgba[..used]) {
        let _ = decode_all(&pixels, None);
        let _ = decode_all(&pixels, Some("fuzz"));
        let _ = analyze(&pixels);
    }
});
