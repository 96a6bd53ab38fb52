//! WebAssembly bindings for Pixveil.
//!
//! Every function takes the raw RGBA bytes of a canvas `ImageData` plus its
//! dimensions, so images never leave the browser. Pixel outputs come back as
//! `Uint8ClampedArray`, ready for `new ImageData(data, width, height)`.

use js_sys::Uint8ClampedArray;
use pixveil_core::{Method, PixelBuffer, Stego};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// JSON shape returned by [`analyze_rgba`].
#[derive(Serialize)]
struct AnalysisJson {
    entropy: f64,
    suspicious: bool,
    ones: u64,
    zeros: u64,
    threshold: f64,
    /// RGBA bytes of the black/white LSB plane.
    noise_map: Vec<u8>,
}

fn buffer(rgba: &[u8], width: u32, height: u32) -> Result<PixelBuffer, String> {
    PixelBuffer::from_rgba(width, height, rgba).map_err(|e| e.to_string())
}

fn parse_method(method: &str) -> Result<Method, String> {
    method.parse::<Method>().map_err(|e| e.to_string())
}

fn password(password: &str) -> Option<&str> {
    Some(password).filter(|p| !p.is_empty())
}

fn encode_internal(
    rgba: &[u8],
    width: u32,
    height: u32,
    message: &str,
    password_text: &str,
    method: &str,
) -> Result<Vec<u8>, String> {
    let pixels = buffer(rgba, width, height)?;
    let method = parse_method(method)?;
    Stego::default()
        .encode(&pixels, message, password(password_text), method)
        .map(|out| out.to_rgba_bytes())
        .map_err(|e| e.to_string())
}

fn decode_internal(
    rgba: &[u8],
    width: u32,
    height: u32,
    password_text: &str,
) -> Result<String, String> {
    let pixels = buffer(rgba, width, height)?;
    let report = Stego::default().decode_all(&pixels, password(password_text));
    serde_json::to_string(&report).map_err(|e| format!("Serialization error: {e}"))
}

fn analyze_internal(rgba: &[u8], width: u32, height: u32) -> Result<String, String> {
    let pixels = buffer(rgba, width, height)?;
    let result = Stego::default().analyze(&pixels);
    let json = AnalysisJson {
        entropy: result.entropy,
        suspicious: result.suspicious,
        ones: result.ones,
        zeros: result.zeros,
        threshold: result.threshold,
        noise_map: result.noise_map.to_rgba_bytes(),
    };
    serde_json::to_string(&json).map_err(|e| format!("Serialization error: {e}"))
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Hide `message` and return the new RGBA bytes.
///
/// `password` may be empty for no encryption; `method` is `lsb`, `dct` or
/// `dwt-svd`. Throws on capacity or input errors.
#[wasm_bindgen]
pub fn encode_rgba(
    rgba: &[u8],
    width: u32,
    height: u32,
    message: &str,
    password: &str,
    method: &str,
) -> Result<Uint8ClampedArray, JsError> {
    let bytes = encode_internal(rgba, width, height, message, password, method)
        .map_err(|e| JsError::new(&e))?;
    Ok(Uint8ClampedArray::from(bytes.as_slice()))
}

/// Try every method and return a JSON report, one entry per method with a
/// `status` of `found`, `undecryptable` or `not_found`.
#[wasm_bindgen]
pub fn decode_rgba(rgba: &[u8], width: u32, height: u32, password: &str) -> String {
    decode_internal(rgba, width, height, password).unwrap_or_else(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&e));
        error_json(&e)
    })
}

/// LSB-plane steganalysis as JSON, including the noise map as RGBA bytes.
#[wasm_bindgen]
pub fn analyze_rgba(rgba: &[u8], width: u32, height: u32) -> String {
    analyze_internal(rgba, width, height).unwrap_or_else(|e| error_json(&e))
}

#[wasm_bindgen]
pub fn embed_watermark_rgba(
    rgba: &[u8],
    width: u32,
    height: u32,
    text: &str,
) -> Result<Uint8ClampedArray, JsError> {
    let pixels = buffer(rgba, width, height).map_err(|e| JsError::new(&e))?;
    let marked = Stego::default().embed_watermark(&pixels, text)?;
    Ok(Uint8ClampedArray::from(marked.to_rgba_bytes().as_slice()))
}

#[wasm_bindgen]
pub fn reveal_watermark_rgba(
    rgba: &[u8],
    width: u32,
    height: u32,
) -> Result<Uint8ClampedArray, JsError> {
    let pixels = buffer(rgba, width, height).map_err(|e| JsError::new(&e))?;
    let revealed = Stego::default().reveal_watermark(&pixels);
    Ok(Uint8ClampedArray::from(revealed.to_rgba_bytes().as_slice()))
}

/// Characters that fit in a `width x height` image with `method`.
#[wasm_bindgen]
pub fn capacity(width: u32, height: u32, method: &str) -> Result<u32, JsError> {
    let method = parse_method(method).map_err(|e| JsError::new(&e))?;
    let bytes = pixveil_core::capacity(width, height, method);
    Ok(u32::try_from(bytes).unwrap_or(u32::MAX))
}

/// Get the library version.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> Vec<u8> {
        [128, 128, 128, 255].repeat((width * height) as usize)
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let cover = gray(32, 32);
        let stego = encode_internal(&cover, 32, 32, "from js", "", "lsb").unwrap();
        assert_eq!(stego.len(), cover.len());

        let json: serde_json::Value =
            serde_json::from_str(&decode_internal(&stego, 32, 32, "").unwrap()).unwrap();
        assert_eq!(json["lsb"]["status"], "found");
        assert_eq!(json["lsb"]["message"], "from js");
        assert_eq!(json["lsb"]["decrypted"], false);
    }

    #[test]
    fn test_encrypted_roundtrip() {
        let cover = gray(64, 64);
        let stego = encode_internal(&cover, 64, 64, "hidden", "pw", "lsb").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&decode_internal(&stego, 64, 64, "pw").unwrap()).unwrap();
        assert_eq!(json["lsb"]["message"], "hidden");
        assert_eq!(json["lsb"]["decrypted"], true);
    }

    #[test]
    fn test_bad_inputs() {
        assert!(encode_internal(&[0; 10], 32, 32, "x", "", "lsb").is_err());
        assert!(encode_internal(&gray(8, 8), 8, 8, "x", "", "jpeg").is_err());
        assert!(decode_internal(&[0; 3], 1, 1, "").is_err());
    }

    #[test]
    fn test_analyze_json() {
        let json: serde_json::Value =
            serde_json::from_str(&analyze_internal(&gray(4, 4), 4, 4).unwrap()).unwrap();
        assert_eq!(json["entropy"], 0.0);
        assert_eq!(json["zeros"], 16);
        assert_eq!(json["noise_map"].as_array().unwrap().len(), 64);
    }

    #[test]
    fn test_version() {
        assert!(!get_version().is_empty());
    }
}
