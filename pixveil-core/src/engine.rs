//! High-level operations: optional encryption around the codecs, multi-method
//! decoding, steganalysis and watermarking, all driven by one [`StegoConfig`].

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::{self, AnalysisResult};
use crate::codec::Method;
use crate::config::StegoConfig;
use crate::crypto;
use crate::error::{Result, StegoError};
use crate::pixels::PixelBuffer;
use crate::progress::{NoProgress, Progress};
use crate::watermark;

/// What one method found in an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodOutcome {
    /// A payload was recovered. `decrypted` is true when a password was
    /// supplied and opened it.
    Found { message: String, decrypted: bool },
    /// A payload was recovered but the password did not open it.
    Undecryptable { raw: String },
    NotFound,
}

impl MethodOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Found { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Per-method results of [`Stego::decode_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeReport {
    pub lsb: MethodOutcome,
    pub dct: MethodOutcome,
    pub dwt_svd: MethodOutcome,
}

impl DecodeReport {
    pub fn get(&self, method: Method) -> &MethodOutcome {
        match method {
            Method::Lsb => &self.lsb,
            Method::Dct => &self.dct,
            Method::DwtSvd => &self.dwt_svd,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Method, &MethodOutcome)> {
        Method::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    /// First method (in LSB, DCT, DWT-SVD order) that yielded a message.
    pub fn first_found(&self) -> Option<(Method, &str)> {
        self.iter()
            .find_map(|(method, outcome)| outcome.message().map(|msg| (method, msg)))
    }

    /// True when some payload exists but none could be decrypted.
    pub fn only_undecryptable(&self) -> bool {
        self.first_found().is_none()
            && self
                .iter()
                .any(|(_, outcome)| matches!(outcome, MethodOutcome::Undecryptable { .. }))
    }
}

/// Treat `Some("")` as no password.
fn effective_password(password: Option<&str>) -> Option<&str> {
    password.filter(|p| !p.is_empty())
}

/// The steganography engine.
#[derive(Debug, Clone, Default)]
pub struct Stego {
    config: StegoConfig,
}

impl Stego {
    pub fn new(config: StegoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StegoConfig {
        &self.config
    }

    /// Hide `message` with `method`, encrypting it first when a password is
    /// given. Returns a new buffer; the input is not modified.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty message, `CapacityExceeded` when the
    /// (possibly encrypted) payload does not fit.
    pub fn encode(
        &self,
        pixels: &PixelBuffer,
        message: &str,
        password: Option<&str>,
        method: Method,
    ) -> Result<PixelBuffer> {
        self.encode_with_progress(pixels, message, password, method, &mut NoProgress)
    }

    pub fn encode_with_progress(
        &self,
        pixels: &PixelBuffer,
        message: &str,
        password: Option<&str>,
        method: Method,
        progress: &mut dyn Progress,
    ) -> Result<PixelBuffer> {
        if message.is_empty() {
            return Err(StegoError::InvalidInput("Message is empty".into()));
        }

        let payload = match effective_password(password) {
            Some(password) => crypto::encrypt(message, password)?,
            None => message.to_owned(),
        };
        debug!(
            %method,
            encrypted = effective_password(password).is_some(),
            payload_bytes = payload.len(),
            width = pixels.width(),
            height = pixels.height(),
            "Encoding"
        );

        let out = method.encode(pixels, &payload, &self.config, progress)?;
        info!(%method, bytes = payload.len(), "Message embedded");
        Ok(out)
    }

    /// Recover a message hidden with `method`, decrypting it when a password
    /// is given.
    ///
    /// # Errors
    ///
    /// `NotFound` when no terminated payload is present, `CryptoFailure` when
    /// a password is given and does not open the payload.
    pub fn decode(
        &self,
        pixels: &PixelBuffer,
        password: Option<&str>,
        method: Method,
    ) -> Result<String> {
        self.decode_with_progress(pixels, password, method, &mut NoProgress)
    }

    pub fn decode_with_progress(
        &self,
        pixels: &PixelBuffer,
        password: Option<&str>,
        method: Method,
        progress: &mut dyn Progress,
    ) -> Result<String> {
        let raw = method.decode(pixels, &self.config, progress)?;
        match effective_password(password) {
            Some(password) => crypto::decrypt(&raw, password).inspect_err(|e| {
                warn!(%method, error = %e, "Payload found but could not be decrypted");
            }),
            None => Ok(raw),
        }
    }

    /// Run every decoder on the same image.
    pub fn decode_all(&self, pixels: &PixelBuffer, password: Option<&str>) -> DecodeReport {
        let outcome = |method: Method| self.outcome(pixels, password, method);
        DecodeReport {
            lsb: outcome(Method::Lsb),
            dct: outcome(Method::Dct),
            dwt_svd: outcome(Method::DwtSvd),
        }
    }

    fn outcome(&self, pixels: &PixelBuffer, password: Option<&str>, method: Method) -> MethodOutcome {
        let raw = match method.decode(pixels, &self.config, &mut NoProgress) {
            Ok(raw) => raw,
            Err(StegoError::NotFound) => return MethodOutcome::NotFound,
            Err(e) => {
                warn!(%method, error = %e, "Decoder failed");
                return MethodOutcome::NotFound;
            }
        };

        match effective_password(password) {
            None => MethodOutcome::Found {
                message: raw,
                decrypted: false,
            },
            Some(password) => match crypto::decrypt(&raw, password) {
                Ok(message) => MethodOutcome::Found {
                    message,
                    decrypted: true,
                },
                Err(e) => {
                    debug!(%method, error = %e, "Candidate payload did not decrypt");
                    MethodOutcome::Undecryptable { raw }
                }
            },
        }
    }

    pub fn analyze(&self, pixels: &PixelBuffer) -> AnalysisResult {
        analysis::analyze(pixels, &self.config.analysis)
    }

    pub fn analyze_with_progress(
        &self,
        pixels: &PixelBuffer,
        progress: &mut dyn Progress,
    ) -> AnalysisResult {
        analysis::analyze_with_progress(pixels, &self.config.analysis, progress)
    }

    pub fn embed_watermark(&self, pixels: &PixelBuffer, text: &str) -> Result<PixelBuffer> {
        watermark::embed(pixels, text, &self.config.watermark)
    }

    pub fn embed_watermark_with_progress(
        &self,
        pixels: &PixelBuffer,
        text: &str,
        progress: &mut dyn Progress,
    ) -> Result<PixelBuffer> {
        watermark::embed_with_progress(pixels, text, &self.config.watermark, progress)
    }

    pub fn reveal_watermark(&self, pixels: &PixelBuffer) -> PixelBuffer {
        watermark::reveal(pixels, &self.config.watermark)
    }

    pub fn reveal_watermark_with_progress(
        &self,
        pixels: &PixelBuffer,
        progress: &mut dyn Progress,
    ) -> PixelBuffer {
        watermark::reveal_with_progress(pixels, &self.config.watermark, progress)
    }

    /// Maximum message length in bytes for `method` at this size.
    ///
    /// The count is for the payload as stored: a password-protected message
    /// has less room, since the envelope is about 4/3 the padded ciphertext.
    pub fn capacity(&self, width: u32, height: u32, method: Method) -> usize {
        method.capacity(width, height, &self.config)
    }
}

/// [`Stego::encode`] with the default configuration.
pub fn encode(
    pixels: &PixelBuffer,
    message: &str,
    password: Option<&str>,
    method: Method,
) -> Result<PixelBuffer> {
    Stego::default().encode(pixels, message, password, method)
}

/// [`Stego::decode`] with the default configuration.
pub fn decode(pixels: &PixelBuffer, password: Option<&str>, method: Method) -> Result<String> {
    Stego::default().decode(pixels, password, method)
}

/// [`Stego::decode_all`] with the default configuration.
pub fn decode_all(pixels: &PixelBuffer, password: Option<&str>) -> DecodeReport {
    Stego::default().decode_all(pixels, password)
}

pub fn analyze(pixels: &PixelBuffer) -> AnalysisResult {
    Stego::default().analyze(pixels)
}

pub fn embed_watermark(pixels: &PixelBuffer, text: &str) -> Result<PixelBuffer> {
    Stego::default().embed_watermark(pixels, text)
}

pub fn reveal_watermark(pixels: &PixelBuffer) -> PixelBuffer {
    Stego::default().reveal_watermark(pixels)
}
