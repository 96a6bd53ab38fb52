//! Embedding methods.
//!
//! Each method is a [`Codec`]: it knows its terminator, its capacity for a
//! given image size, and how to write and read terminated payload bits.
//! [`Method`] is the tag callers pass around; it dispatches to the concrete
//! codec with an explicit `match`.
//!
//! | Method   | Carrier                      | Bits per unit        | Terminator |
//! |----------|------------------------------|----------------------|------------|
//! | LSB      | R, G, B least significant bit | 3 per pixel          | `$!@#END`  |
//! | DCT      | Green, 8x8 DCT pair (2,1)/(1,2) | 1 per `r` blocks   | `$!#`      |
//! | DWT-SVD  | Blue, Haar LL singular value | 1 per block          | `$!@#END`  |

pub mod dct;
pub mod dwt_svd;
pub mod lsb;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bits;
use crate::config::StegoConfig;
use crate::error::{Result, StegoError};
use crate::pixels::PixelBuffer;
use crate::progress::Progress;

pub use dct::DctCodec;
pub use dwt_svd::DwtSvdCodec;
pub use lsb::LsbCodec;

/// A payload embedding technique.
pub trait Codec {
    /// End-of-message marker appended to every payload.
    fn terminator(&self) -> &'static [u8];

    /// Payload bits (terminator included) that fit in a `width x height` image.
    fn capacity_bits(&self, width: u32, height: u32) -> usize;

    /// Write `bits` into `pixels`.
    ///
    /// Implementations check capacity before touching any pixel, so a
    /// `CapacityExceeded` error leaves the buffer unchanged.
    fn embed_bits(
        &self,
        pixels: &mut PixelBuffer,
        bits: &[bool],
        progress: &mut dyn Progress,
    ) -> Result<()>;

    /// Read bits until the terminator is found and return the bytes before it.
    fn extract_bytes(
        &self,
        pixels: &PixelBuffer,
        max_scan_bytes: Option<usize>,
        progress: &mut dyn Progress,
    ) -> Option<Vec<u8>>;

    /// Scan cap used when the caller does not configure one.
    fn default_scan_limit(&self) -> Option<usize> {
        None
    }

    /// Maximum message length in bytes (UTF-8 code units).
    fn capacity(&self, width: u32, height: u32) -> usize {
        (self.capacity_bits(width, height) / 8).saturating_sub(self.terminator().len())
    }

    /// Embed `message` into a copy of `pixels`.
    fn encode(
        &self,
        pixels: &PixelBuffer,
        message: &str,
        progress: &mut dyn Progress,
    ) -> Result<PixelBuffer> {
        let payload = bits::terminated(message.as_bytes(), self.terminator());
        let payload_bits = bits::to_bits(&payload);
        let available_bits = self.capacity_bits(pixels.width(), pixels.height());
        if payload_bits.len() > available_bits {
            return Err(StegoError::CapacityExceeded {
                needed_bits: payload_bits.len(),
                available_bits,
            });
        }

        let mut out = pixels.clone();
        self.embed_bits(&mut out, &payload_bits, progress)?;
        Ok(out)
    }

    /// Recover a message embedded by [`Codec::encode`].
    ///
    /// `max_scan_bytes` falls back to [`Codec::default_scan_limit`].
    fn decode(
        &self,
        pixels: &PixelBuffer,
        max_scan_bytes: Option<usize>,
        progress: &mut dyn Progress,
    ) -> Result<String> {
        let limit = max_scan_bytes.or(self.default_scan_limit());
        let bytes = self
            .extract_bytes(pixels, limit, progress)
            .ok_or(StegoError::NotFound)?;
        String::from_utf8(bytes).map_err(|_| {
            debug!("Terminator found but payload is not valid UTF-8");
            StegoError::NotFound
        })
    }
}

/// Embedding method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Least significant bit of R, G and B. High capacity, fragile.
    #[default]
    Lsb,
    /// DCT coefficient ordering with majority vote. Survives mild noise.
    Dct,
    /// Haar DWT + SVD quantization. Very low capacity.
    DwtSvd,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Lsb, Method::Dct, Method::DwtSvd];

    pub fn name(self) -> &'static str {
        match self {
            Self::Lsb => "lsb",
            Self::Dct => "dct",
            Self::DwtSvd => "dwt-svd",
        }
    }

    pub fn terminator(self) -> &'static [u8] {
        match self {
            Self::Lsb => lsb::TERMINATOR,
            Self::Dct => dct::TERMINATOR,
            Self::DwtSvd => dwt_svd::TERMINATOR,
        }
    }

    /// Maximum message length in bytes for this method.
    pub fn capacity(self, width: u32, height: u32, config: &StegoConfig) -> usize {
        match self {
            Self::Lsb => LsbCodec.capacity(width, height),
            Self::Dct => DctCodec::new(&config.dct).capacity(width, height),
            Self::DwtSvd => DwtSvdCodec::new(&config.dwt_svd).capacity(width, height),
        }
    }

    pub fn encode(
        self,
        pixels: &PixelBuffer,
        message: &str,
        config: &StegoConfig,
        progress: &mut dyn Progress,
    ) -> Result<PixelBuffer> {
        match self {
            Self::Lsb => LsbCodec.encode(pixels, message, progress),
            Self::Dct => DctCodec::new(&config.dct).encode(pixels, message, progress),
            Self::DwtSvd => DwtSvdCodec::new(&config.dwt_svd).encode(pixels, message, progress),
        }
    }

    pub fn decode(
        self,
        pixels: &PixelBuffer,
        config: &StegoConfig,
        progress: &mut dyn Progress,
    ) -> Result<String> {
        let limit = config.max_scan_bytes;
        match self {
            Self::Lsb => LsbCodec.decode(pixels, limit, progress),
            Self::Dct => DctCodec::new(&config.dct).decode(pixels, limit, progress),
            Self::DwtSvd => DwtSvdCodec::new(&config.dwt_svd).decode(pixels, limit, progress),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lsb" => Ok(Self::Lsb),
            "dct" => Ok(Self::Dct),
            "dwt-svd" | "dwt_svd" | "dwtsvd" => Ok(Self::DwtSvd),
            other => Err(StegoError::InvalidInput(format!(
                "Unknown method '{other}' (expected lsb, dct or dwt-svd)"
            ))),
        }
    }
}

/// Capacity with default settings, as characters (UTF-8 bytes).
pub fn capacity(width: u32, height: u32, method: Method) -> usize {
    method.capacity(width, height, &StegoConfig::default())
}
