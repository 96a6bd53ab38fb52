#![no_main]

//! Fuzz target for envelope decryption.
//!
//! Arbitrary text is fed to the Base64/AES-CBC decryptor; every malformed
//! envelope must come back as an error, never a panic.
//!
//! Run with: cargo +nightly fuzz run fuzz_decrypt

use libfuzzer_sys::fuzz_target;
use pixveil_core::crypto;

fuzz_target!(|data: &[u8]| {
    if let Ok(envelope) = std::str::from_utf8(data) {
        let _ = crypto::decrypt(envelope, "fuzz");
        let _ = crypto::looks_like_envelope(envelope);
    }
});
