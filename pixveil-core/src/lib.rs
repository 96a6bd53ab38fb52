//! Pixveil Core - image steganography engine
//!
//! Hides text in the pixels of an image and gets it back, optionally behind a
//! password, and inspects images for signs of hidden payloads.
//!
//! # Features
//!
//! - LSB embedding across R, G and B (high capacity, fragile)
//! - DCT coefficient-ordering embedding with majority vote (noise tolerant)
//! - Haar DWT + SVD embedding (very low capacity)
//! - AES-256-CBC password envelopes with zeroized key material
//! - LSB-plane entropy steganalysis with a noise map
//! - Faint tiled text watermark and its reveal filter
//!
//! # Example
//!
//! ```
//! use pixveil_core::{Method, PixelBuffer, Rgba, Stego};
//!
//! # fn example() -> pixveil_core::Result<()> {
//! let cover = PixelBuffer::new(64, 64, Rgba::gray(128));
//! let stego = Stego::default();
//!
//! let hidden = stego.encode(&cover, "meet at noon", Some("pw"), Method::Lsb)?;
//! assert_eq!(stego.decode(&hidden, Some("pw"), Method::Lsb)?, "meet at noon");
//!
//! let report = stego.decode_all(&hidden, Some("pw"));
//! assert_eq!(report.first_found(), Some((Method::Lsb, "meet at noon")));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod analysis;
pub mod bits;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod pixels;
pub mod progress;
pub mod transform;
pub mod watermark;

// Re-export main types for convenience
pub use analysis::AnalysisResult;
pub use codec::{capacity, Codec, DctCodec, DwtSvdCodec, LsbCodec, Method};
pub use config::StegoConfig;
pub use engine::{
    analyze, decode, decode_all, embed_watermark, encode, reveal_watermark, DecodeReport,
    MethodOutcome, Stego,
};
pub use error::{Result, StegoError};
pub use pixels::{Channel, PixelBuffer, Rgba};
pub use progress::{NoProgress, Progress};
