//! Engine configuration.
//!
//! Every tunable has a default matching the canonical protocol constants, so
//! `StegoConfig::default()` produces images any other default-configured
//! decoder can read. Values can be loaded from JSON or overridden from
//! `PIXVEIL_*` environment variables.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StegoError};

/// Default DCT coefficient ordering margin.
pub const DEFAULT_DCT_ALPHA: f64 = 70.0;
/// Default number of blocks carrying each DCT payload bit.
pub const DEFAULT_DCT_REPETITION: usize = 5;
/// Default QIM step for the largest singular value in DWT-SVD embedding.
pub const DEFAULT_DWT_SVD_STEP: f64 = 20.0;
/// Default LSB entropy cutoff above which an image is flagged.
pub const DEFAULT_ENTROPY_THRESHOLD: f64 = 0.92;
/// Default blue-channel increment under the watermark mask.
pub const DEFAULT_WATERMARK_DELTA: u8 = 5;
/// Default amplification applied when revealing a watermark.
pub const DEFAULT_REVEAL_GAIN: f64 = 20.0;

/// DCT codec parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DctConfig {
    /// Minimum gap enforced between the two carrier coefficients.
    pub alpha: f64,
    /// Consecutive blocks written per payload bit (majority vote group).
    pub repetition: usize,
}

impl Default for DctConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_DCT_ALPHA,
            repetition: DEFAULT_DCT_REPETITION,
        }
    }
}

/// DWT-SVD codec parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DwtSvdConfig {
    /// Quantization step for the largest singular value.
    pub step: f64,
}

impl Default for DwtSvdConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_DWT_SVD_STEP,
        }
    }
}

/// Steganalysis parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub entropy_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            entropy_threshold: DEFAULT_ENTROPY_THRESHOLD,
        }
    }
}

/// Watermark parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Added to the blue channel wherever the text mask is set.
    pub delta: u8,
    /// Gain applied to `B - (R+G)/2` when revealing.
    pub gain: f64,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            delta: DEFAULT_WATERMARK_DELTA,
            gain: DEFAULT_REVEAL_GAIN,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub dct: DctConfig,
    pub dwt_svd: DwtSvdConfig,
    pub analysis: AnalysisConfig,
    pub watermark: WatermarkConfig,
    /// Stop decoding after this many bytes without a terminator.
    /// `None` scans the whole carrier.
    pub max_scan_bytes: Option<usize>,
}

impl StegoConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| StegoError::InvalidInput(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PIXVEIL_*` environment overrides on top of `self`.
    ///
    /// Unparseable values are ignored and the existing value is kept.
    pub fn with_env_overrides(mut self) -> Self {
        fn var<T: std::str::FromStr>(name: &str) -> Option<T> {
            std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
        }

        if let Some(alpha) = var("PIXVEIL_DCT_ALPHA") {
            self.dct.alpha = alpha;
        }
        if let Some(repetition) = var("PIXVEIL_DCT_REPETITION") {
            self.dct.repetition = repetition;
        }
        if let Some(step) = var("PIXVEIL_DWT_SVD_STEP") {
            self.dwt_svd.step = step;
        }
        if let Some(threshold) = var("PIXVEIL_ENTROPY_THRESHOLD") {
            self.analysis.entropy_threshold = threshold;
        }
        if let Some(delta) = var("PIXVEIL_WATERMARK_DELTA") {
            self.watermark.delta = delta;
        }
        if let Some(gain) = var("PIXVEIL_REVEAL_GAIN") {
            self.watermark.gain = gain;
        }
        if let Some(limit) = var("PIXVEIL_MAX_SCAN_BYTES") {
            self.max_scan_bytes = Some(limit);
        }
        self
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Reject parameter values the codecs cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.dct.alpha.is_finite() && self.dct.alpha > 0.0) {
            return Err(StegoError::InvalidInput(
                "dct.alpha must be a positive number".into(),
            ));
        }
        if self.dct.repetition == 0 {
            return Err(StegoError::InvalidInput(
                "dct.repetition must be at least 1".into(),
            ));
        }
        if !(self.dwt_svd.step.is_finite() && self.dwt_svd.step > 0.0) {
            return Err(StegoError::InvalidInput(
                "dwt_svd.step must be a positive number".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.analysis.entropy_threshold) {
            return Err(StegoError::InvalidInput(
                "analysis.entropy_threshold must be within 0.0..=1.0".into(),
            ));
        }
        if !self.watermark.gain.is_finite() {
            return Err(StegoError::InvalidInput(
                "watermark.gain must be finite".into(),
            ));
        }
        if self.max_scan_bytes == Some(0) {
            return Err(StegoError::InvalidInput(
                "max_scan_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
